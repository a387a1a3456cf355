//! Buildpack layers.
//!
//! A layer is a directory under the layers root plus a sidecar TOML file that
//! tells the lifecycle what to do with it.
//!
//! # Layout
//!
//! ```text
//! <layers>/
//! ├── hugo/                # layer contents
//! │   ├── bin/hugo
//! │   ├── env/             # environment for every phase
//! │   ├── env.build/
//! │   └── env.launch/
//! └── hugo.toml            # sidecar metadata
//! ```
//!
//! # Sidecar Format
//!
//! ```toml
//! [types]
//! build = true
//! launch = false
//! cache = true
//!
//! [metadata]
//! ```
//!
//! `build` makes the contents visible to later buildpacks, `launch` ships them
//! in the app image, and `cache` keeps them around for the next build.

mod env;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::LAYER_BIN_DIR;

pub use env::Environment;

/// Errors that can occur when managing layers.
#[derive(Debug, Error)]
pub enum LayerError {
  #[error("permission denied: {path}")]
  PermissionDenied {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read layer metadata {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse layer metadata {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create {path}: {source}")]
  Create {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize layer metadata: {0}")]
  Serialize(#[source] toml::ser::Error),

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl LayerError {
  /// Wrap an I/O error, reporting permission problems uniformly whatever the step.
  fn io(path: &Path, source: io::Error, wrap: fn(PathBuf, io::Error) -> LayerError) -> Self {
    if source.kind() == io::ErrorKind::PermissionDenied {
      LayerError::PermissionDenied {
        path: path.to_path_buf(),
        source,
      }
    } else {
      wrap(path.to_path_buf(), source)
    }
  }
}

/// The layers root handed to the build phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
  pub path: PathBuf,
}

impl Layers {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Look up a layer by name.
  ///
  /// Flags and metadata persisted by a previous build are loaded from the
  /// sidecar file. A layer that was never persisted comes back with every
  /// flag off. The layer directory itself is not touched.
  pub fn get(&self, name: &str) -> Result<Layer, LayerError> {
    let mut layer = Layer::empty(name, self.path.join(name));
    let metadata_path = self.metadata_path(name);

    let content = match fs::read_to_string(&metadata_path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(layer = %name, "no layer metadata, starting fresh");
        return Ok(layer);
      }
      Err(e) => {
        return Err(LayerError::io(&metadata_path, e, |path, source| LayerError::Read {
          path,
          source,
        }));
      }
    };

    let file: LayerFile = toml::from_str(&content).map_err(|source| LayerError::Parse {
      path: metadata_path.clone(),
      source,
    })?;

    layer.build = file.types.build;
    layer.launch = file.types.launch;
    layer.cache = file.types.cache;
    layer.metadata = file.metadata;

    debug!(layer = %name, build = layer.build, launch = layer.launch, cache = layer.cache, "loaded layer metadata");
    Ok(layer)
  }

  /// Write a layer's sidecar file and environment directories.
  ///
  /// Called once per layer after a successful build; the lifecycle reads the
  /// result when the build process exits.
  pub fn persist(&self, layer: &Layer) -> Result<(), LayerError> {
    let metadata_path = self.metadata_path(&layer.name);

    info!(
      layer = %layer.name,
      path = %metadata_path.display(),
      build = layer.build,
      launch = layer.launch,
      cache = layer.cache,
      "persisting layer"
    );

    let file = LayerFile {
      types: LayerTypes {
        build: layer.build,
        launch: layer.launch,
        cache: layer.cache,
      },
      metadata: layer.metadata.clone(),
    };
    let content = toml::to_string(&file).map_err(LayerError::Serialize)?;

    fs::write(&metadata_path, content)
      .map_err(|e| LayerError::io(&metadata_path, e, |path, source| LayerError::Write { path, source }))?;

    for (dir, env) in [
      ("env", &layer.shared_env),
      ("env.build", &layer.build_env),
      ("env.launch", &layer.launch_env),
    ] {
      let env_dir = layer.path.join(dir);
      env
        .write(&env_dir)
        .map_err(|e| LayerError::io(&env_dir, e, |path, source| LayerError::Write { path, source }))?;
    }

    Ok(())
  }

  fn metadata_path(&self, name: &str) -> PathBuf {
    self.path.join(format!("{name}.toml"))
  }
}

/// A single layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
  pub name: String,
  /// Always `<layers root>/<name>`.
  pub path: PathBuf,
  pub build: bool,
  pub launch: bool,
  pub cache: bool,
  pub shared_env: Environment,
  pub build_env: Environment,
  pub launch_env: Environment,
  pub metadata: toml::Table,
}

impl Layer {
  fn empty(name: &str, path: PathBuf) -> Self {
    Self {
      name: name.to_string(),
      path,
      build: false,
      launch: false,
      cache: false,
      shared_env: Environment::new(),
      build_env: Environment::new(),
      launch_env: Environment::new(),
      metadata: toml::Table::new(),
    }
  }

  /// Clear the layer so nothing from an earlier build leaks into this one.
  ///
  /// Deletes the contents and the persisted sidecar file, recreates an empty
  /// directory, and returns the layer with every flag off and no environment.
  /// The name and path do not change.
  pub fn reset(self) -> Result<Self, LayerError> {
    info!(layer = %self.name, path = %self.path.display(), "resetting layer");

    match fs::remove_dir_all(&self.path) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => {
        return Err(LayerError::io(&self.path, e, |path, source| LayerError::Remove {
          path,
          source,
        }));
      }
    }

    if let Some(metadata_path) = self.metadata_path() {
      match fs::remove_file(&metadata_path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
          return Err(LayerError::io(&metadata_path, e, |path, source| LayerError::Remove {
            path,
            source,
          }));
        }
      }
    }

    fs::create_dir_all(&self.path)
      .map_err(|e| LayerError::io(&self.path, e, |path, source| LayerError::Create { path, source }))?;

    Ok(Layer::empty(&self.name, self.path))
  }

  /// Directory holding the layer's executables.
  pub fn bin_dir(&self) -> PathBuf {
    self.path.join(LAYER_BIN_DIR)
  }

  fn metadata_path(&self) -> Option<PathBuf> {
    self.path.parent().map(|root| root.join(format!("{}.toml", self.name)))
  }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayerTypes {
  #[serde(default)]
  build: bool,
  #[serde(default)]
  launch: bool,
  #[serde(default)]
  cache: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayerFile {
  #[serde(default)]
  types: LayerTypes,
  #[serde(default)]
  metadata: toml::Table,
}
