//! Reading and writing plan files shared with the lifecycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::plan::types::{BuildPlan, BuildpackPlan};

/// Errors that can occur when exchanging plan files with the lifecycle.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error("failed to read plan {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse plan {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to serialize plan: {0}")]
  Serialize(#[source] toml::ser::Error),

  #[error("failed to write plan {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Read the buildpack plan given to the build phase.
pub fn read_buildpack_plan(path: &Path) -> Result<BuildpackPlan, PlanError> {
  read_toml(path)
}

/// Write the buildpack plan produced by the build phase.
pub fn write_buildpack_plan(path: &Path, plan: &BuildpackPlan) -> Result<(), PlanError> {
  write_toml(path, plan)
}

/// Write the build plan produced by a passing detection.
pub fn write_build_plan(path: &Path, plan: &BuildPlan) -> Result<(), PlanError> {
  write_toml(path, plan)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, PlanError> {
  let content = fs::read_to_string(path).map_err(|source| PlanError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  toml::from_str(&content).map_err(|source| PlanError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), PlanError> {
  let content = toml::to_string(value).map_err(PlanError::Serialize)?;
  debug!(path = %path.display(), "writing plan");

  fs::write(path, content).map_err(|source| PlanError::Write {
    path: path.to_path_buf(),
    source,
  })
}
