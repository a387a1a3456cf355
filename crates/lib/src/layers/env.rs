//! Layer environment files.
//!
//! The lifecycle applies a layer's environment by reading one file per
//! variable operation from the layer's env directories:
//!
//! ```text
//! <layer>/env/PATH.prepend         # all phases
//! <layer>/env/PATH.delim
//! <layer>/env.build/HUGO_ENV.override
//! <layer>/env.launch/...
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Environment variable operations for one env directory.
///
/// Keys are file names (`<VAR>.<op>`), values are file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(BTreeMap<String, String>);

impl Environment {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace any existing value of `name`.
  pub fn set_override(&mut self, name: &str, value: impl Into<String>) {
    self.0.insert(format!("{name}.override"), value.into());
  }

  /// Set `name` only if nothing else set it.
  pub fn set_default(&mut self, name: &str, value: impl Into<String>) {
    self.0.insert(format!("{name}.default"), value.into());
  }

  /// Put `value` in front of the existing value, separated by `delim`.
  pub fn prepend(&mut self, name: &str, value: impl Into<String>, delim: &str) {
    self.0.insert(format!("{name}.prepend"), value.into());
    self.0.insert(format!("{name}.delim"), delim.to_string());
  }

  /// Put `value` after the existing value, separated by `delim`.
  pub fn append(&mut self, name: &str, value: impl Into<String>, delim: &str) {
    self.0.insert(format!("{name}.append"), value.into());
    self.0.insert(format!("{name}.delim"), delim.to_string());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Write every operation as a file under `dir`. Nothing is created when empty.
  pub(crate) fn write(&self, dir: &Path) -> io::Result<()> {
    if self.is_empty() {
      return Ok(());
    }

    fs::create_dir_all(dir)?;
    for (file, value) in &self.0 {
      fs::write(dir.join(file), value)?;
    }
    Ok(())
  }
}
