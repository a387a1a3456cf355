//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

pub const STACK: &str = "io.buildpacks.stacks.bionic";

/// Isolated buildpack environment.
///
/// Each test gets its own application, buildpack root, layers, platform, and
/// plan paths under one temporary directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    for dir in ["app", "cnb", "layers", "platform"] {
      std::fs::create_dir_all(env.temp.path().join(dir)).unwrap();
    }
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    let p = self.temp.path().join(relative_path);
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Ship `script` as the Hugo artifact and list it in `cnb/buildpack.toml`.
  ///
  /// The artifact is a bare file, so delivery copies it to `<layer>/hugo`.
  pub fn install_fake_hugo(&self, script: &str) {
    self.write_file("artifacts/hugo", script);
    let sha256 = hex::encode(Sha256::digest(script.as_bytes()));
    let uri = format!("file://{}", self.path("artifacts/hugo").display());

    self.write_file(
      "cnb/buildpack.toml",
      &format!(
        r#"api = "0.7"

[buildpack]
id = "io.hugopack.hugo"
name = "Hugo Buildpack"
version = "0.0.1"

[[metadata.dependencies]]
id = "hugo"
name = "Hugo"
version = "0.80.0"
sha256 = "{sha256}"
uri = "{uri}"
stacks = ["{STACK}"]
"#
      ),
    );
  }

  /// A command for the hugopack binary running inside the application.
  pub fn hugopack_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("hugopack");
    cmd.current_dir(self.path("app"));
    cmd.env("CNB_BUILDPACK_DIR", self.path("cnb"));
    cmd.env("CNB_STACK_ID", STACK);
    cmd.env_remove("BP_HUGO_VERSION");
    cmd.env_remove("HUGOPACK_LOG");
    cmd
  }

  pub fn detect(&self) -> Command {
    let mut cmd = self.hugopack_cmd();
    cmd.arg("detect").arg(self.path("platform")).arg(self.path("plan.toml"));
    cmd
  }

  pub fn build(&self) -> Command {
    let mut cmd = self.hugopack_cmd();
    cmd
      .arg("build")
      .arg(self.path("layers"))
      .arg(self.path("platform"))
      .arg(self.path("plan.toml"));
    cmd
  }
}
