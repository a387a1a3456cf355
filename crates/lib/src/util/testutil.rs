//! Test utilities for hugopack-lib.
//!
//! Shell helpers for tests that spawn real processes, archive builders for
//! dependency delivery, and recording doubles for the build collaborators.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::dependency::{Dependency, DependencyError, DependencyManager};
use crate::execute::{ExecError, Executable, Execution};
use crate::plan::{BuildpackPlanEntry, EntryResolver, Priority};
use crate::util::hash::hash_file;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Write a gzipped tarball named `name` into `dir` holding `files` as
/// `(path, contents)` pairs.
pub fn hugo_tarball(dir: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
  let path = dir.join(name);
  let file = fs::File::create(&path).unwrap();
  let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
  let mut builder = tar::Builder::new(encoder);

  for (entry_path, contents) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, entry_path, contents.as_bytes()).unwrap();
  }

  builder.into_inner().unwrap().finish().unwrap();
  path
}

/// A `hugo` catalog entry pointing at a local artifact, with its real checksum.
pub fn dependency_for(artifact: &Path, strip_components: usize) -> Dependency {
  Dependency {
    id: "hugo".to_string(),
    name: "Hugo".to_string(),
    version: "0.80.0".to_string(),
    sha256: hash_file(artifact).unwrap(),
    uri: format!("file://{}", artifact.display()),
    stacks: vec!["*".to_string()],
    strip_components,
  }
}

/// Arguments of one `EntryResolver::resolve` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveEntryCall {
  pub name: String,
  pub entries: Vec<BuildpackPlanEntry>,
}

/// Arguments of one `EntryResolver::merge_layer_types` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeCall {
  pub name: String,
  pub entries: Vec<BuildpackPlanEntry>,
}

/// An [`EntryResolver`] returning canned answers and recording its calls.
#[derive(Debug, Default)]
pub struct FakeEntryResolver {
  pub entry: Option<BuildpackPlanEntry>,
  pub launch: bool,
  pub build: bool,
  pub resolve_calls: Mutex<Vec<ResolveEntryCall>>,
  pub merge_calls: Mutex<Vec<MergeCall>>,
}

impl FakeEntryResolver {
  pub fn returning(entry: BuildpackPlanEntry) -> Self {
    Self {
      entry: Some(entry),
      ..Self::default()
    }
  }

  pub fn with_layer_types(mut self, launch: bool, build: bool) -> Self {
    self.launch = launch;
    self.build = build;
    self
  }
}

impl EntryResolver for FakeEntryResolver {
  fn resolve(
    &self,
    name: &str,
    entries: &[BuildpackPlanEntry],
    _priorities: &[Priority],
  ) -> (Option<BuildpackPlanEntry>, Vec<BuildpackPlanEntry>) {
    self.resolve_calls.lock().unwrap().push(ResolveEntryCall {
      name: name.to_string(),
      entries: entries.to_vec(),
    });
    (self.entry.clone(), Vec::new())
  }

  fn merge_layer_types(&self, name: &str, entries: &[BuildpackPlanEntry]) -> (bool, bool) {
    self.merge_calls.lock().unwrap().push(MergeCall {
      name: name.to_string(),
      entries: entries.to_vec(),
    });
    (self.launch, self.build)
  }
}

/// Arguments of one `DependencyManager::resolve` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveDependencyCall {
  pub manifest_path: PathBuf,
  pub id: String,
  pub version: Option<String>,
  pub stack: String,
}

/// Arguments of one `DependencyManager::install` call.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallCall {
  pub dependency: Dependency,
  pub cnb_path: PathBuf,
  pub layer_path: PathBuf,
}

/// A [`DependencyManager`] that never touches the network or the layer.
///
/// A configured error message is returned as an `io::Error` so callers see
/// the text verbatim.
#[derive(Debug, Default)]
pub struct FakeDependencyManager {
  pub dependency: Dependency,
  pub resolve_error: Option<String>,
  pub install_error: Option<String>,
  pub resolve_calls: Mutex<Vec<ResolveDependencyCall>>,
  pub install_calls: Mutex<Vec<InstallCall>>,
}

impl FakeDependencyManager {
  pub fn returning(dependency: Dependency) -> Self {
    Self {
      dependency,
      ..Self::default()
    }
  }
}

impl DependencyManager for FakeDependencyManager {
  fn resolve(
    &self,
    manifest_path: &Path,
    id: &str,
    version: Option<&str>,
    stack: &str,
  ) -> Result<Dependency, DependencyError> {
    self.resolve_calls.lock().unwrap().push(ResolveDependencyCall {
      manifest_path: manifest_path.to_path_buf(),
      id: id.to_string(),
      version: version.map(str::to_string),
      stack: stack.to_string(),
    });

    match &self.resolve_error {
      Some(message) => Err(DependencyError::Io(io::Error::other(message.clone()))),
      None => Ok(self.dependency.clone()),
    }
  }

  async fn install(&self, dependency: &Dependency, cnb_path: &Path, layer_path: &Path) -> Result<(), DependencyError> {
    self.install_calls.lock().unwrap().push(InstallCall {
      dependency: dependency.clone(),
      cnb_path: cnb_path.to_path_buf(),
      layer_path: layer_path.to_path_buf(),
    });

    match &self.install_error {
      Some(message) => Err(DependencyError::Io(io::Error::other(message.clone()))),
      None => Ok(()),
    }
  }
}

/// What a [`FakeExecutable`] was asked to run. Sinks are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
  pub args: Vec<String>,
  pub dir: Option<PathBuf>,
  pub env: Option<Vec<(OsString, OsString)>>,
}

impl ExecutionRecord {
  pub fn env_var(&self, name: &str) -> Option<&OsStr> {
    crate::execute::lookup(self.env.as_deref()?, name)
  }
}

/// An [`Executable`] that records executions instead of spawning anything.
///
/// `output` is written to the execution's stdout before the configured
/// result is returned.
#[derive(Debug, Default)]
pub struct FakeExecutable {
  pub output: Option<String>,
  pub execute_error: Option<String>,
  pub executions: Mutex<Vec<ExecutionRecord>>,
}

impl FakeExecutable {
  pub fn failing(message: &str) -> Self {
    Self {
      execute_error: Some(message.to_string()),
      ..Self::default()
    }
  }
}

impl Executable for FakeExecutable {
  async fn execute(&self, execution: Execution) -> Result<(), ExecError> {
    let Execution {
      args,
      dir,
      env,
      mut stdout,
      ..
    } = execution;
    self.executions.lock().unwrap().push(ExecutionRecord { args, dir, env });

    if let Some(output) = &self.output {
      stdout.write_all(output.as_bytes())?;
    }

    match &self.execute_error {
      Some(message) => Err(ExecError::Io(io::Error::other(message.clone()))),
      None => Ok(()),
    }
  }
}
