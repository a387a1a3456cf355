//! Version selection against the dependency catalog.

use semver::{Version, VersionReq};
use tracing::debug;

use crate::dependency::{Dependency, DependencyError};
use crate::manifest::BuildpackManifest;

/// Select the catalog entry for `id` on `stack`.
///
/// - No entry for `(id, stack)` is [`DependencyError::NotFound`].
/// - An unconstrained version (`None`, `""`, `"default"`, `"*"`) falls back to the
///   manifest's `default-versions`, then to the highest version.
/// - A version equal to an entry's version string selects that entry.
/// - Anything else is read as a semver requirement and the highest match
///   wins; no match is [`DependencyError::VersionConflict`].
///
/// Ties keep manifest order.
pub fn resolve_dependency(
  manifest: &BuildpackManifest,
  id: &str,
  version: Option<&str>,
  stack: &str,
) -> Result<Dependency, DependencyError> {
  let candidates: Vec<&Dependency> = manifest
    .metadata
    .dependencies
    .iter()
    .filter(|d| d.id == id && d.supports_stack(stack))
    .collect();

  if candidates.is_empty() {
    return Err(DependencyError::NotFound {
      id: id.to_string(),
      stack: stack.to_string(),
    });
  }

  let requested = version
    .map(str::trim)
    .filter(|v| !v.is_empty() && !matches!(*v, "default" | "*"))
    .or_else(|| manifest.metadata.default_versions.get(id).map(String::as_str));

  debug!(id = %id, stack = %stack, requested = ?requested, candidates = candidates.len(), "resolving dependency");

  let Some(requested) = requested.filter(|v| *v != "*") else {
    return Ok(highest(&candidates).clone());
  };

  if let Some(exact) = candidates.iter().find(|d| d.version == requested) {
    return Ok((*exact).clone());
  }

  let requirement =
    VersionReq::parse(requested.trim_start_matches('v')).map_err(|source| DependencyError::InvalidVersion {
      version: requested.to_string(),
      source,
    })?;

  let compatible: Vec<&Dependency> = candidates
    .iter()
    .copied()
    .filter(|d| parse_version(&d.version).is_some_and(|v| requirement.matches(&v)))
    .collect();

  if compatible.is_empty() {
    return Err(DependencyError::VersionConflict {
      id: id.to_string(),
      version: requested.to_string(),
      stack: stack.to_string(),
      available: candidates.iter().map(|d| d.version.clone()).collect(),
    });
  }

  Ok(highest(&compatible).clone())
}

/// The entry with the greatest version; unparseable versions rank lowest.
fn highest<'a>(candidates: &[&'a Dependency]) -> &'a Dependency {
  // max_by_key keeps the last maximum, so walk backwards to keep the first.
  candidates
    .iter()
    .rev()
    .max_by_key(|d| parse_version(&d.version))
    .copied()
    .unwrap_or(candidates[0])
}

/// Parse a catalog version, tolerating a leading `v` and missing components.
fn parse_version(version: &str) -> Option<Version> {
  let version = version.trim().trim_start_matches('v');
  if let Ok(parsed) = Version::parse(version) {
    return Some(parsed);
  }

  let parts = version.split('.').count();
  if parts < 3 && !version.is_empty() {
    let padded = format!("{version}{}", ".0".repeat(3 - parts));
    return Version::parse(&padded).ok();
  }
  None
}
