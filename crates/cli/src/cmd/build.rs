//! Implementation of the `hugopack build` command.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use hugopack_lib::build::{BuildContext, HugoBuild};
use hugopack_lib::config::Config;
use hugopack_lib::consts::{BUILDPACK_TOML, HUGO};
use hugopack_lib::dependency::HugoDependencyManager;
use hugopack_lib::emitter::Emitter;
use hugopack_lib::execute::CommandExecutable;
use hugopack_lib::layers::Layers;
use hugopack_lib::manifest::BuildpackManifest;
use hugopack_lib::plan::{Planner, read_buildpack_plan, write_buildpack_plan};

use crate::output::print_success;

/// Execute the build command.
///
/// Runs the Hugo build for the current directory, then hands the lifecycle
/// its results:
/// - persists every returned layer under `layers_dir`
/// - rewrites `plan_path` with the result plan
pub fn cmd_build(layers_dir: &Path, platform_dir: &Path, plan_path: &Path, config: &Config) -> Result<()> {
  let stack = config.stack_id()?.to_string();
  debug!(platform = %platform_dir.display(), layers = %layers_dir.display(), "starting build phase");

  let cwd = std::env::current_dir().context("Failed to determine working directory")?;
  let working_dir = dunce::canonicalize(&cwd).unwrap_or(cwd);

  let manifest = BuildpackManifest::load(&config.buildpack_dir.join(BUILDPACK_TOML))?;
  let plan = read_buildpack_plan(plan_path)?;
  let layers = Layers::new(layers_dir);

  let ctx = BuildContext {
    working_dir,
    cnb_path: config.buildpack_dir.clone(),
    stack,
    buildpack_info: manifest.buildpack,
    plan,
    layers: layers.clone(),
  };

  let build = HugoBuild::new(
    Planner::new(),
    HugoDependencyManager::new(),
    CommandExecutable::new(HUGO),
  );
  let logs = Emitter::stdout();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(build.run(&ctx, &logs))?;

  for layer in &result.layers {
    layers.persist(layer)?;
  }
  write_buildpack_plan(plan_path, &result.plan)?;
  info!(layers = result.layers.len(), plan = %plan_path.display(), "build results written");

  print_success("Build complete");
  Ok(())
}
