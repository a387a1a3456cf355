//! User-facing progress output.
//!
//! The lifecycle shows buildpack output to users verbatim, so progress is
//! written as plain indented lines rather than through `tracing`. Each level
//! of the hierarchy indents by two spaces:
//!
//! ```text
//! Hugo Buildpack 0.1.0
//!   Installing Hugo
//!     Selected Hugo version: 0.80.0
//!
//!   Executing build process
//!     Running 'hugo --destination public'
//! ```
//!
//! An [`Emitter`] is created by the caller and handed to the build, never
//! stored in a global.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Mutex;

pub struct Emitter {
  out: Mutex<Box<dyn Write + Send>>,
}

impl Emitter {
  pub fn new(out: impl Write + Send + 'static) -> Self {
    Self {
      out: Mutex::new(Box::new(out)),
    }
  }

  /// Emitter writing to the process stdout.
  pub fn stdout() -> Self {
    Self::new(io::stdout())
  }

  /// Emitter that discards everything.
  pub fn sink() -> Self {
    Self::new(io::sink())
  }

  /// Top-level heading, usually `<buildpack name> <version>`.
  pub fn title(&self, message: impl Display) {
    self.line(0, message);
  }

  /// A phase of the build.
  pub fn process(&self, message: impl Display) {
    self.line(1, message);
  }

  /// A step inside a phase.
  pub fn subprocess(&self, message: impl Display) {
    self.line(2, message);
  }

  /// Multi-line detail, e.g. captured command output. Every line is indented.
  pub fn detail(&self, text: &str) {
    for line in text.lines() {
      self.line(3, line);
    }
  }

  pub fn break_line(&self) {
    self.line(0, "");
  }

  fn line(&self, depth: usize, message: impl Display) {
    let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
    // Best effort: a closed stdout must not fail the build.
    let _ = writeln!(out, "{:indent$}{}", "", message, indent = depth * 2);
  }
}

impl std::fmt::Debug for Emitter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Emitter").finish_non_exhaustive()
  }
}
