//! Detection: deciding whether an application is a Hugo site.
//!
//! An application applies when its `content/` directory holds at least one
//! Markdown or HTML file at any depth.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::consts::{CONTENT_DIR, CONTENT_EXTENSIONS, HUGO, HUGO_VERSION_ENV};
use crate::plan::{BuildPlan, BuildPlanProvision, BuildPlanRequirement, EntryMetadata};

#[derive(Debug, Error)]
pub enum DetectError {
  /// The buildpack does not apply. Not a failure of the scan itself.
  #[error("no *.md or *.html files found in content dir")]
  NoContent,

  #[error("searching for *.md and *.html files in {path}: {source}")]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

impl DetectError {
  /// Whether this means "does not apply" rather than "something broke".
  pub fn is_no_content(&self) -> bool {
    matches!(self, DetectError::NoContent)
  }
}

/// Scan `working_dir` and produce the build plan for a Hugo site.
///
/// `hugo_version` is the user's requested version, if any; it is attached to
/// the requirement with [`HUGO_VERSION_ENV`] as its source.
pub fn detect(working_dir: &Path, hugo_version: Option<&str>) -> Result<BuildPlan, DetectError> {
  let content_dir = working_dir.join(CONTENT_DIR);
  if !content_dir.is_dir() {
    debug!(path = %content_dir.display(), "no content directory");
    return Err(DetectError::NoContent);
  }

  if !has_content(&content_dir)? {
    return Err(DetectError::NoContent);
  }

  let mut metadata = EntryMetadata::build_only();
  if let Some(version) = hugo_version.filter(|v| !v.is_empty()) {
    metadata.version = Some(version.to_string());
    metadata.version_source = Some(HUGO_VERSION_ENV.to_string());
  }

  Ok(BuildPlan {
    provides: vec![BuildPlanProvision { name: HUGO.to_string() }],
    requires: vec![BuildPlanRequirement {
      name: HUGO.to_string(),
      metadata,
    }],
  })
}

fn has_content(content_dir: &Path) -> Result<bool, DetectError> {
  for entry in WalkDir::new(content_dir) {
    let entry = entry.map_err(|source| DetectError::Scan {
      path: content_dir.to_path_buf(),
      source,
    })?;

    // Links are not followed, so a symlinked page shows up as a non-directory.
    if !entry.file_type().is_dir() && is_content_file(entry.path()) {
      debug!(path = %entry.path().display(), "found content file");
      return Ok(true);
    }
  }
  Ok(false)
}

fn is_content_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext))
}
