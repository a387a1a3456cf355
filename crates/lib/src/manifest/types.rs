//! Manifest types for the buildpack.
//!
//! # Structure
//!
//! ```toml
//! api = "0.7"
//!
//! [buildpack]
//! id = "io.hugopack.hugo"
//! name = "Hugo Buildpack"
//! version = "0.1.0"
//!
//! [metadata.default-versions]
//! hugo = "0.80.*"
//!
//! [[metadata.dependencies]]
//! id = "hugo"
//! name = "Hugo"
//! version = "0.80.0"
//! sha256 = "..."
//! uri = "https://github.com/gohugoio/hugo/releases/download/v0.80.0/hugo_0.80.0_Linux-64bit.tar.gz"
//! stacks = ["io.buildpacks.stacks.bionic"]
//! ```
//!
//! Unknown keys are ignored so the same file can carry lifecycle settings
//! (`[[stacks]]`, `[[order]]`, ...) this crate never reads.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a buildpack manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read buildpack manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse buildpack manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// The parsed `buildpack.toml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildpackManifest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api: Option<String>,

  #[serde(default)]
  pub buildpack: BuildpackInfo,

  #[serde(default)]
  pub metadata: ManifestMetadata,
}

impl BuildpackManifest {
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    toml::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// Identity of the buildpack, shown in the build output title.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackInfo {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub version: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
  /// Version (or version requirement) to use per dependency id when the plan
  /// does not ask for one.
  #[serde(rename = "default-versions", default, skip_serializing_if = "BTreeMap::is_empty")]
  pub default_versions: BTreeMap<String, String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<Dependency>,
}

/// One installable artifact from the dependency catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
  pub id: String,
  #[serde(default)]
  pub name: String,
  pub version: String,
  /// SHA-256 of the artifact at `uri`, lowercase hex.
  pub sha256: String,
  pub uri: String,
  /// Stacks the artifact runs on; `"*"` matches any stack.
  #[serde(default)]
  pub stacks: Vec<String>,
  /// Leading path components dropped when extracting an archive.
  #[serde(rename = "strip-components", default)]
  pub strip_components: usize,
}

impl Dependency {
  pub fn supports_stack(&self, stack: &str) -> bool {
    self.stacks.iter().any(|s| s == stack || s == "*")
  }
}
