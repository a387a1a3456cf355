use std::path::PathBuf;

use crate::layers::{Layer, Layers};
use crate::manifest::BuildpackInfo;
use crate::plan::BuildpackPlan;

/// Everything the lifecycle hands the build phase.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Application source root; Hugo runs here.
  pub working_dir: PathBuf,
  /// Buildpack root holding `buildpack.toml`.
  pub cnb_path: PathBuf,
  pub stack: String,
  pub buildpack_info: BuildpackInfo,
  pub plan: BuildpackPlan,
  pub layers: Layers,
}

/// What a successful build returns to the lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildResult {
  pub plan: BuildpackPlan,
  pub layers: Vec<Layer>,
}
