//! Settings read from the lifecycle and the user's environment.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::HUGO_VERSION_ENV;

pub const BUILDPACK_DIR_ENV: &str = "CNB_BUILDPACK_DIR";
pub const STACK_ID_ENV: &str = "CNB_STACK_ID";
pub const LOG_LEVEL_ENV: &str = "BP_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("could not locate the buildpack directory: {0}")]
  BuildpackDir(#[source] io::Error),

  #[error("CNB_STACK_ID is not set")]
  MissingStack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Root of the buildpack (where `buildpack.toml` lives).
  pub buildpack_dir: PathBuf,
  pub stack_id: Option<String>,
  pub hugo_version: Option<String>,
  pub debug: bool,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      buildpack_dir: buildpack_dir()?,
      stack_id: non_empty_var(STACK_ID_ENV),
      hugo_version: non_empty_var(HUGO_VERSION_ENV),
      debug: non_empty_var(LOG_LEVEL_ENV).is_some_and(|level| level.eq_ignore_ascii_case("debug")),
    })
  }

  /// The stack, which a build cannot do without.
  pub fn stack_id(&self) -> Result<&str, ConfigError> {
    self.stack_id.as_deref().ok_or(ConfigError::MissingStack)
  }

  /// The requested Hugo version: the process environment first, then the
  /// platform's `env/BP_HUGO_VERSION` file.
  pub fn requested_hugo_version(&self, platform_dir: &Path) -> Option<String> {
    self
      .hugo_version
      .clone()
      .or_else(|| platform_env(platform_dir, HUGO_VERSION_ENV))
  }
}

/// A user-provided variable from `<platform>/env/<name>`, trimmed.
///
/// Absent, unreadable, or blank files read as unset.
pub fn platform_env(platform_dir: &Path, name: &str) -> Option<String> {
  fs::read_to_string(platform_dir.join("env").join(name))
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

/// `CNB_BUILDPACK_DIR`, or the directory two levels above the running
/// executable (`<buildpack>/bin/build`).
fn buildpack_dir() -> Result<PathBuf, ConfigError> {
  if let Some(dir) = non_empty_var(BUILDPACK_DIR_ENV) {
    return Ok(PathBuf::from(dir));
  }

  let exe = env::current_exe().map_err(ConfigError::BuildpackDir)?;
  exe
    .parent()
    .and_then(|bin| bin.parent())
    .map(PathBuf::from)
    .ok_or_else(|| {
      ConfigError::BuildpackDir(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} has no grandparent directory", exe.display()),
      ))
    })
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|value| !value.is_empty())
}
