//! The build phase.
//!
//! [`HugoBuild`] installs Hugo into a layer and renders the site:
//!
//! 1. select the `hugo` plan entry and read its requested version;
//! 2. resolve a concrete dependency from `buildpack.toml` for the stack;
//! 3. reset the `hugo` layer and tag it with the merged layer types;
//! 4. install the dependency into the layer;
//! 5. run `hugo --destination public` with the layer's `bin/` first on `PATH`.
//!
//! Any failure ends the build with the collaborator's error. Nothing is
//! persisted here; the caller writes the returned layers.

mod context;

use std::env::{self, JoinPathsError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{BUILDPACK_TOML, DESTINATION_DIR, HUGO, HUGO_VERSION_ENV};
use crate::dependency::{DependencyError, DependencyManager};
use crate::emitter::Emitter;
use crate::execute::{ExecError, Executable, Execution, OutputBuffer};
use crate::layers::LayerError;
use crate::plan::{BuildpackPlan, EntryResolver, Priority};

pub use context::{BuildContext, BuildResult};

/// Errors that end a build.
///
/// Collaborator errors pass through with their own message.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Resolve(DependencyError),

  #[error(transparent)]
  Layer(#[from] LayerError),

  #[error(transparent)]
  Install(DependencyError),

  #[error(transparent)]
  Execute(#[from] ExecError),

  #[error("failed to build search path: {0}")]
  SearchPath(#[from] JoinPathsError),
}

/// Installs Hugo and builds the site with it.
#[derive(Debug)]
pub struct HugoBuild<R, D, E> {
  resolver: R,
  dependencies: D,
  hugo: E,
}

impl<R, D, E> HugoBuild<R, D, E>
where
  R: EntryResolver,
  D: DependencyManager,
  E: Executable,
{
  pub fn new(resolver: R, dependencies: D, hugo: E) -> Self {
    Self {
      resolver,
      dependencies,
      hugo,
    }
  }

  pub async fn run(&self, ctx: &BuildContext, logs: &Emitter) -> Result<BuildResult, BuildError> {
    logs.title(format_args!("{} {}", ctx.buildpack_info.name, ctx.buildpack_info.version));

    let priorities = [Priority::from(HUGO_VERSION_ENV)];
    let (entry, _) = self.resolver.resolve(HUGO, &ctx.plan.entries, &priorities);
    let name = entry.as_ref().map_or(HUGO, |e| e.name.as_str());
    let version = entry.as_ref().and_then(|e| e.version());
    debug!(entry = ?entry, version = ?version, "selected plan entry");

    let dependency = self
      .dependencies
      .resolve(&ctx.cnb_path.join(BUILDPACK_TOML), name, version, &ctx.stack)
      .map_err(BuildError::Resolve)?;
    info!(id = %dependency.id, version = %dependency.version, stack = %ctx.stack, "resolved hugo dependency");

    let mut layer = ctx.layers.get(HUGO)?.reset()?;
    let (launch, build) = self.resolver.merge_layer_types(HUGO, &ctx.plan.entries);
    layer.build = build;
    layer.cache = build;
    layer.launch = launch;

    logs.process("Installing Hugo");
    logs.subprocess(format_args!("Selected Hugo version: {}", dependency.version));

    self
      .dependencies
      .install(&dependency, &ctx.cnb_path, &layer.path)
      .await
      .map_err(BuildError::Install)?;

    logs.break_line();

    logs.process("Executing build process");
    let args = vec!["--destination".to_string(), DESTINATION_DIR.to_string()];
    logs.subprocess(format_args!("Running '{} {}'", HUGO, args.join(" ")));

    let buffer = OutputBuffer::new();
    let mut execution = Execution::new(args);
    execution.dir = Some(ctx.working_dir.clone());
    execution.env = Some(environment_with_bin(&layer.bin_dir())?);
    execution.stdout = Box::new(buffer.clone());
    execution.stderr = Box::new(buffer.clone());

    if let Err(e) = self.hugo.execute(execution).await {
      logs.detail(&buffer.contents());
      return Err(e.into());
    }

    info!(layer = %layer.name, build = layer.build, launch = layer.launch, cache = layer.cache, "hugo build complete");

    Ok(BuildResult {
      plan: BuildpackPlan::default(),
      layers: vec![layer],
    })
  }
}

/// The current process environment with `bin_dir` prepended to `PATH`.
fn environment_with_bin(bin_dir: &Path) -> Result<Vec<(OsString, OsString)>, BuildError> {
  let mut search_path: Vec<PathBuf> = vec![bin_dir.to_path_buf()];
  if let Some(existing) = env::var_os("PATH") {
    search_path.extend(env::split_paths(&existing));
  }
  let search_path = env::join_paths(search_path)?;

  let mut vars: Vec<(OsString, OsString)> = env::vars_os().filter(|(name, _)| name != "PATH").collect();
  vars.push(("PATH".into(), search_path));
  Ok(vars)
}
