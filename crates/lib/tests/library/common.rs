//! Shared fixtures for library tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use hugopack_lib::build::BuildContext;
use hugopack_lib::layers::Layers;
use hugopack_lib::manifest::BuildpackManifest;
use hugopack_lib::plan::BuildpackPlan;
use hugopack_lib::util::hash::hash_bytes;

pub const STACK: &str = "io.buildpacks.stacks.bionic";

/// A scratch tree laid out the way the lifecycle presents it.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    let workspace = Self {
      temp: TempDir::new().unwrap(),
    };
    for dir in ["app", "cnb", "layers", "platform"] {
      fs::create_dir_all(workspace.path(dir)).unwrap();
    }
    workspace
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  pub fn write(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.path(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  /// Publish `script` as the only `hugo` catalog entry.
  pub fn catalog(&self, script: &str) {
    let artifact = self.write("artifacts/hugo", script);
    self.write(
      "cnb/buildpack.toml",
      &format!(
        r#"[buildpack]
id = "io.hugopack.hugo"
name = "Hugo Buildpack"
version = "0.0.1"

[[metadata.dependencies]]
id = "hugo"
version = "0.80.0"
sha256 = "{}"
uri = "file://{}"
stacks = ["{STACK}"]
"#,
        hash_bytes(script.as_bytes()),
        artifact.display()
      ),
    );
  }

  pub fn context(&self, plan: BuildpackPlan) -> BuildContext {
    let manifest = BuildpackManifest::load(&self.path("cnb/buildpack.toml")).unwrap();
    BuildContext {
      working_dir: self.path("app"),
      cnb_path: self.path("cnb"),
      stack: STACK.to_string(),
      buildpack_info: manifest.buildpack,
      plan,
      layers: Layers::new(self.path("layers")),
    }
  }
}

pub fn exists(path: impl AsRef<Path>) -> bool {
  path.as_ref().exists()
}
