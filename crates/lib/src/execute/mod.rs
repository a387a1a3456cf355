//! Running external programs.
//!
//! The build talks to Hugo through the [`Executable`] trait so tests can
//! substitute a recording double. [`CommandExecutable`] is the real thing.

mod command;

use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use command::CommandExecutable;

/// Errors that can occur while running an external program.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program was not found on the execution's `PATH`.
  #[error("executable '{program}' not found: {source}")]
  NotFound {
    program: String,
    #[source]
    source: which::Error,
  },

  /// The process could not be started.
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The process ran and failed. `code` is `None` when a signal ended it.
  #[error("{program} failed with exit code {code:?}")]
  Failed { program: String, code: Option<i32> },

  /// I/O error while streaming output or waiting.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Where a stream of process output goes.
pub type Sink = Box<dyn Write + Send>;

/// Everything needed to run a program once.
pub struct Execution {
  pub args: Vec<String>,
  /// Working directory. `None` inherits the caller's.
  pub dir: Option<PathBuf>,
  /// The complete environment of the child. `None` inherits the caller's.
  pub env: Option<Vec<(OsString, OsString)>>,
  pub stdout: Sink,
  pub stderr: Sink,
}

impl Execution {
  /// An execution with the given arguments whose output is discarded.
  pub fn new<I, S>(args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      args: args.into_iter().map(Into::into).collect(),
      dir: None,
      env: None,
      stdout: Box::new(io::sink()),
      stderr: Box::new(io::sink()),
    }
  }

  /// The value this execution will give `name`, if it overrides the environment.
  pub fn env_var(&self, name: &str) -> Option<&OsStr> {
    lookup(self.env.as_deref()?, name)
  }
}

/// The last value assigned to `name` in an environment list.
pub(crate) fn lookup<'a>(env: &'a [(OsString, OsString)], name: &str) -> Option<&'a OsStr> {
  env
    .iter()
    .rev()
    .find(|(key, _)| key == name)
    .map(|(_, value)| value.as_os_str())
}

impl std::fmt::Debug for Execution {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Execution")
      .field("args", &self.args)
      .field("dir", &self.dir)
      .field("env", &self.env.as_ref().map(|env| env.len()))
      .finish_non_exhaustive()
  }
}

/// A program that can be run with an [`Execution`].
pub trait Executable {
  /// Run to completion. Output is written to the execution's sinks as it is
  /// produced; the process error is returned as is.
  fn execute(&self, execution: Execution) -> impl Future<Output = Result<(), ExecError>> + Send;
}

/// A cloneable in-memory sink.
///
/// Clones share one buffer, so handing a clone to both `stdout` and `stderr`
/// collects the streams in the order their writes arrive.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Arc<Mutex<Vec<u8>>>);

impl OutputBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Everything written so far, lossily decoded.
  pub fn contents(&self) -> String {
    let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
    String::from_utf8_lossy(&bytes).into_owned()
  }
}

impl Write for OutputBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    let mut bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
    bytes.extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
