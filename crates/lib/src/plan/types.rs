//! Build plan and buildpack plan types.
//!
//! Detection produces a [`BuildPlan`] (what this buildpack requires and
//! provides). The lifecycle resolves every buildpack's build plans into a
//! [`BuildpackPlan`] and hands it back at build time as a list of entries.
//!
//! # TOML Layout
//!
//! ```toml
//! [[entries]]
//! name = "hugo"
//!
//! [entries.metadata]
//! build = true
//! version = "0.80.*"
//! version-source = "BP_HUGO_VERSION"
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata attached to a plan requirement or entry.
///
/// Buildpacks in a group write arbitrary keys here. The ones this buildpack
/// acts on have explicit fields; everything else is kept in `extra`. A known
/// key holding a value of the wrong type (say `build = "yes"`) reads as absent
/// instead of failing the whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
  #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,

  #[serde(
    rename = "version-source",
    default,
    deserialize_with = "lenient_string",
    skip_serializing_if = "Option::is_none"
  )]
  pub version_source: Option<String>,

  #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
  pub build: Option<bool>,

  #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
  pub launch: Option<bool>,

  #[serde(flatten)]
  pub extra: toml::Table,
}

impl EntryMetadata {
  /// Metadata for a requirement needed at build time only.
  pub fn build_only() -> Self {
    Self {
      build: Some(true),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  pub fn wants_build(&self) -> bool {
    self.build.unwrap_or(false)
  }

  pub fn wants_launch(&self) -> bool {
    self.launch.unwrap_or(false)
  }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match toml::Value::deserialize(deserializer)? {
    toml::Value::Boolean(value) => Some(value),
    _ => None,
  })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match toml::Value::deserialize(deserializer)? {
    toml::Value::String(value) => Some(value),
    _ => None,
  })
}

/// One entry of the buildpack plan handed to the build phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackPlanEntry {
  pub name: String,

  #[serde(default, skip_serializing_if = "EntryMetadata::is_empty")]
  pub metadata: EntryMetadata,
}

impl BuildpackPlanEntry {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      metadata: EntryMetadata::default(),
    }
  }

  pub fn with_metadata(mut self, metadata: EntryMetadata) -> Self {
    self.metadata = metadata;
    self
  }

  /// The requested version, if the entry carries one.
  pub fn version(&self) -> Option<&str> {
    self.metadata.version.as_deref()
  }
}

/// The buildpack plan: input to the build phase, and its (possibly empty) output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackPlan {
  #[serde(default)]
  pub entries: Vec<BuildpackPlanEntry>,
}

/// A dependency this buildpack needs some buildpack in the group to provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanRequirement {
  pub name: String,

  #[serde(default, skip_serializing_if = "EntryMetadata::is_empty")]
  pub metadata: EntryMetadata,
}

/// A dependency this buildpack offers to the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanProvision {
  pub name: String,
}

/// Output of a passing detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub provides: Vec<BuildPlanProvision>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub requires: Vec<BuildPlanRequirement>,
}
