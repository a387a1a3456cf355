//! Implementation of the `hugopack detect` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use hugopack_lib::config::Config;
use hugopack_lib::consts::DETECT_FAIL_EXIT_CODE;
use hugopack_lib::detect::detect;
use hugopack_lib::plan::write_build_plan;

use crate::output::print_info;

/// Execute the detect command.
///
/// Scans the current directory and writes the build plan to `plan_path`.
/// An application that is not a Hugo site exits with the lifecycle's
/// "does not apply" status instead of an error.
pub fn cmd_detect(platform_dir: &Path, plan_path: &Path, config: &Config) -> Result<ExitCode> {
  let cwd = std::env::current_dir().context("Failed to determine working directory")?;
  let working_dir = dunce::canonicalize(&cwd).unwrap_or(cwd);
  let version = config.requested_hugo_version(platform_dir);

  let plan = match detect(&working_dir, version.as_deref()) {
    Ok(plan) => plan,
    Err(e) if e.is_no_content() => {
      print_info(&e.to_string());
      return Ok(ExitCode::from(DETECT_FAIL_EXIT_CODE as u8));
    }
    Err(e) => return Err(e.into()),
  };

  write_build_plan(plan_path, &plan)?;
  info!(path = %plan_path.display(), version = ?version, "build plan written");

  Ok(ExitCode::SUCCESS)
}
