//! The production [`DependencyManager`].

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::consts::{HUGO, LAYER_BIN_DIR};
use crate::dependency::deliver::{fetch, unpack};
use crate::dependency::{Dependency, DependencyError, DependencyManager, resolve_dependency};
use crate::manifest::BuildpackManifest;

/// Installs the Hugo binary from the buildpack's dependency catalog.
#[derive(Debug, Clone)]
pub struct HugoDependencyManager {
  client: reqwest::Client,
  binary: String,
}

impl HugoDependencyManager {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
      binary: HUGO.to_string(),
    }
  }
}

impl Default for HugoDependencyManager {
  fn default() -> Self {
    Self::new()
  }
}

impl DependencyManager for HugoDependencyManager {
  fn resolve(
    &self,
    manifest_path: &Path,
    id: &str,
    version: Option<&str>,
    stack: &str,
  ) -> Result<Dependency, DependencyError> {
    let manifest = BuildpackManifest::load(manifest_path)?;
    let dependency = resolve_dependency(&manifest, id, version, stack)?;
    debug!(id = %dependency.id, version = %dependency.version, uri = %dependency.uri, "resolved dependency");
    Ok(dependency)
  }

  async fn install(&self, dependency: &Dependency, cnb_path: &Path, layer_path: &Path) -> Result<(), DependencyError> {
    info!(id = %dependency.id, version = %dependency.version, layer = %layer_path.display(), "installing dependency");

    let staging = tempfile::tempdir()?;
    let artifact = fetch(&self.client, dependency, cnb_path, staging.path()).await?;

    let unpack_dependency = dependency.clone();
    let unpack_layer = layer_path.to_path_buf();
    tokio::task::spawn_blocking(move || unpack(&artifact, &unpack_dependency, &unpack_layer))
      .await
      .map_err(io::Error::other)??;

    move_into_bin(layer_path, &self.binary)
  }
}

/// Move `<layer>/<binary>` to `<layer>/bin/<binary>`.
///
/// `bin/` must not already exist.
fn move_into_bin(layer_path: &Path, binary: &str) -> Result<(), DependencyError> {
  let bin_dir = layer_path.join(LAYER_BIN_DIR);
  fs::create_dir(&bin_dir).map_err(|source| DependencyError::Install {
    step: "create",
    path: bin_dir.clone(),
    source,
  })?;

  let from = layer_path.join(binary);
  let to = bin_dir.join(binary);
  fs::rename(&from, &to).map_err(|source| DependencyError::Install {
    step: "move",
    path: from.clone(),
    source,
  })?;

  debug!(path = %to.display(), "binary placed on layer bin dir");
  Ok(())
}
