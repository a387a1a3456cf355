//! Resolving and installing catalog dependencies.
//!
//! Resolution picks one [`Dependency`] from `buildpack.toml` for an id,
//! version, and stack. Installation fetches and verifies the artifact,
//! unpacks it into a layer, and moves the binary to `<layer>/bin/` so the
//! directory can go straight onto `PATH`.

pub mod deliver;
mod resolve;
mod service;

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use crate::manifest::Dependency;
use crate::manifest::ManifestError;
pub use resolve::resolve_dependency;
pub use service::HugoDependencyManager;

/// Errors that can occur while resolving or installing a dependency.
#[derive(Debug, Error)]
pub enum DependencyError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  /// No catalog entry for the id runs on the stack.
  #[error("failed to satisfy \"{id}\" dependency for stack \"{stack}\"")]
  NotFound { id: String, stack: String },

  /// Entries exist for the stack but none has the requested version.
  #[error(
    "failed to satisfy \"{id}\" dependency version constraint \"{version}\": no compatible versions on \"{stack}\" stack. Supported versions are: [{}]",
    .available.join(", ")
  )]
  VersionConflict {
    id: String,
    version: String,
    stack: String,
    available: Vec<String>,
  },

  #[error("invalid version constraint \"{version}\": {source}")]
  InvalidVersion {
    version: String,
    #[source]
    source: semver::Error,
  },

  #[error("failed to fetch {uri}: {message}")]
  Fetch { uri: String, message: String },

  #[error("checksum mismatch for {uri}: expected {expected}, got {actual}")]
  ChecksumMismatch {
    uri: String,
    expected: String,
    actual: String,
  },

  #[error("failed to extract {path}: {source}")]
  Extract {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Moving the delivered binary into `bin/` failed.
  #[error("failed to {step} {path}: {source}")]
  Install {
    step: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Resolves dependencies from a catalog and installs them into layers.
pub trait DependencyManager {
  /// Pick the dependency to install.
  ///
  /// `version` of `None` means unconstrained: the manifest default or the
  /// highest available version is used.
  fn resolve(&self, manifest_path: &Path, id: &str, version: Option<&str>, stack: &str)
  -> Result<Dependency, DependencyError>;

  /// Materialize `dependency` into `layer_path`, leaving its binary under
  /// `layer_path/bin/`.
  fn install(
    &self,
    dependency: &Dependency,
    cnb_path: &Path,
    layer_path: &Path,
  ) -> impl Future<Output = Result<(), DependencyError>> + Send;
}
