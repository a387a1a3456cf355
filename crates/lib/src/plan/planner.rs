//! Selecting the plan entry to act on.
//!
//! Several buildpacks in a group may require the same dependency, each with
//! its own metadata. The [`EntryResolver`] picks one entry for a name and
//! folds the layer-type requests of all of them together.

use regex::Regex;

use crate::plan::types::BuildpackPlanEntry;

/// How much weight to give an entry's `version-source`.
///
/// Priorities are checked in order; an entry takes the index of the first one
/// that matches. Entries matching none rank after all others.
#[derive(Debug, Clone)]
pub enum Priority {
  Exact(String),
  Pattern(Regex),
}

impl Priority {
  fn matches(&self, source: &str) -> bool {
    match self {
      Priority::Exact(expected) => expected == source,
      Priority::Pattern(pattern) => pattern.is_match(source),
    }
  }
}

impl From<&str> for Priority {
  fn from(value: &str) -> Self {
    Priority::Exact(value.to_string())
  }
}

impl From<Regex> for Priority {
  fn from(value: Regex) -> Self {
    Priority::Pattern(value)
  }
}

pub trait EntryResolver {
  /// Select the entry for `name` with the highest-priority `version-source`.
  ///
  /// Ties keep plan order. Returns `None` when no entry has that name; the
  /// second element holds the other entries with the same name.
  fn resolve(
    &self,
    name: &str,
    entries: &[BuildpackPlanEntry],
    priorities: &[Priority],
  ) -> (Option<BuildpackPlanEntry>, Vec<BuildpackPlanEntry>);

  /// Whether any entry named `name` asks for a launch layer and a build layer.
  ///
  /// Returns `(launch, build)`.
  fn merge_layer_types(&self, name: &str, entries: &[BuildpackPlanEntry]) -> (bool, bool);
}

/// The standard [`EntryResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
  pub fn new() -> Self {
    Self
  }
}

impl EntryResolver for Planner {
  fn resolve(
    &self,
    name: &str,
    entries: &[BuildpackPlanEntry],
    priorities: &[Priority],
  ) -> (Option<BuildpackPlanEntry>, Vec<BuildpackPlanEntry>) {
    let mut matching: Vec<&BuildpackPlanEntry> = entries.iter().filter(|e| e.name == name).collect();

    // sort_by_key is stable, so equal ranks keep plan order
    matching.sort_by_key(|entry| rank(entry, priorities));

    let mut matching = matching.into_iter().cloned();
    let selected = matching.next();
    (selected, matching.collect())
  }

  fn merge_layer_types(&self, name: &str, entries: &[BuildpackPlanEntry]) -> (bool, bool) {
    entries
      .iter()
      .filter(|e| e.name == name)
      .fold((false, false), |(launch, build), entry| {
        (launch || entry.metadata.wants_launch(), build || entry.metadata.wants_build())
      })
  }
}

fn rank(entry: &BuildpackPlanEntry, priorities: &[Priority]) -> usize {
  let Some(source) = entry.metadata.version_source.as_deref() else {
    return priorities.len();
  };

  priorities
    .iter()
    .position(|p| p.matches(source))
    .unwrap_or(priorities.len())
}
