mod cmd;
mod output;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hugopack_lib::config::Config;

use crate::cmd::{cmd_build, cmd_detect};
use crate::output::print_error;

/// Filter variable for diagnostic logging.
const LOG_ENV: &str = "HUGOPACK_LOG";

#[derive(Parser)]
#[command(name = "hugopack")]
#[command(author, version, about = "Cloud Native Buildpack for Hugo sites", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Decide whether the application in the current directory is a Hugo site
  Detect {
    /// Platform directory
    platform: PathBuf,
    /// Where to write the build plan
    plan: PathBuf,
  },
  /// Install Hugo and build the site in the current directory
  Build {
    /// Layers directory
    layers: PathBuf,
    /// Platform directory
    platform: PathBuf,
    /// Buildpack plan, rewritten with the result plan
    plan: PathBuf,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse_from(lifecycle_args(std::env::args_os()));

  let config = match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
      print_error(&e.to_string());
      return ExitCode::FAILURE;
    }
  };

  init_tracing(config.debug);

  let result = match cli.command {
    Commands::Detect { platform, plan } => cmd_detect(&platform, &plan, &config),
    Commands::Build { layers, platform, plan } => cmd_build(&layers, &platform, &plan, &config).map(|_| ExitCode::SUCCESS),
  };

  match result {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(debug: bool) {
  let default = if debug { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

/// Turn `bin/detect ARGS` or `bin/build ARGS` into the matching subcommand.
///
/// The lifecycle runs the buildpack through executables named after the
/// phase; a `hugopack` binary linked under those names behaves accordingly.
fn lifecycle_args(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
  let mut args: Vec<OsString> = args.collect();
  let phase = args
    .first()
    .and_then(|argv0| Path::new(argv0).file_name())
    .and_then(|name| name.to_str())
    .filter(|name| matches!(*name, "detect" | "build"))
    .map(OsString::from);

  if let Some(phase) = phase {
    args.insert(1, phase);
  }
  args
}
