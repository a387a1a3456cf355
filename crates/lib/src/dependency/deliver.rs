//! Fetching, verifying, and unpacking dependency artifacts.
//!
//! Artifacts are looked up in this order:
//!
//! 1. the offline cache shipped with the buildpack,
//!    `<cnb>/dependencies/<sha256>/<file name>`;
//! 2. a local file, for `file://` URIs and plain paths;
//! 3. an HTTP(S) download into a staging directory.
//!
//! Whatever the source, the SHA-256 is checked before anything is unpacked.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::consts::DEPENDENCY_CACHE_DIR;
use crate::dependency::{Dependency, DependencyError};
use crate::util::hash::{checksum_matches, hash_bytes, hash_file};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Locate or download the artifact for `dependency` and verify its checksum.
///
/// Downloads land in `staging_dir`. Returns the path of the verified file.
pub async fn fetch(
  client: &reqwest::Client,
  dependency: &Dependency,
  cnb_path: &Path,
  staging_dir: &Path,
) -> Result<PathBuf, DependencyError> {
  let filename = url_to_filename(&dependency.uri);

  let cached = cnb_path
    .join(DEPENDENCY_CACHE_DIR)
    .join(&dependency.sha256)
    .join(&filename);
  if cached.is_file() {
    info!(path = %cached.display(), "using cached dependency");
    verify(&cached, dependency)?;
    return Ok(cached);
  }

  if let Some(local) = local_path(&dependency.uri) {
    debug!(path = %local.display(), "using local dependency");
    verify(&local, dependency)?;
    return Ok(local);
  }

  download(client, dependency, &staging_dir.join(&filename)).await
}

/// Unpack a verified artifact into `layer_path`.
///
/// Gzipped or plain tarballs are extracted with `strip_components` applied.
/// Any other file is treated as the binary itself and copied to
/// `layer_path/<dependency id>` with execute permission.
pub fn unpack(artifact: &Path, dependency: &Dependency, layer_path: &Path) -> Result<(), DependencyError> {
  let extract_err = |source| DependencyError::Extract {
    path: artifact.to_path_buf(),
    source,
  };

  fs::create_dir_all(layer_path)?;

  let mut magic = [0u8; 2];
  let is_gzip = {
    let mut file = fs::File::open(artifact).map_err(extract_err)?;
    file.read_exact(&mut magic).is_ok() && magic == GZIP_MAGIC
  };

  if is_gzip {
    let file = fs::File::open(artifact).map_err(extract_err)?;
    extract_tar(GzDecoder::new(file), layer_path, dependency.strip_components).map_err(extract_err)
  } else if artifact.extension().is_some_and(|ext| ext == "tar") {
    let file = fs::File::open(artifact).map_err(extract_err)?;
    extract_tar(file, layer_path, dependency.strip_components).map_err(extract_err)
  } else {
    let target = layer_path.join(&dependency.id);
    fs::copy(artifact, &target).map_err(extract_err)?;
    make_executable(&target).map_err(extract_err)
  }
}

async fn download(
  client: &reqwest::Client,
  dependency: &Dependency,
  dest_path: &Path,
) -> Result<PathBuf, DependencyError> {
  let uri = &dependency.uri;
  info!(uri = %uri, "downloading dependency");

  let fetch_err = |e: reqwest::Error| DependencyError::Fetch {
    uri: uri.clone(),
    message: e.to_string(),
  };

  let response = client.get(uri).send().await.map_err(fetch_err)?;
  if !response.status().is_success() {
    return Err(DependencyError::Fetch {
      uri: uri.clone(),
      message: format!("HTTP {}", response.status()),
    });
  }

  let bytes = response.bytes().await.map_err(fetch_err)?;

  // Verify hash before writing
  let actual = hash_bytes(&bytes);
  if !checksum_matches(&dependency.sha256, &actual) {
    return Err(DependencyError::ChecksumMismatch {
      uri: uri.clone(),
      expected: dependency.sha256.clone(),
      actual,
    });
  }

  let mut file = tokio::fs::File::create(dest_path).await?;
  file.write_all(&bytes).await?;
  file.flush().await?;

  info!(path = %dest_path.display(), size = bytes.len(), "download complete");
  Ok(dest_path.to_path_buf())
}

fn verify(path: &Path, dependency: &Dependency) -> Result<(), DependencyError> {
  let actual = hash_file(path)?;
  if !checksum_matches(&dependency.sha256, &actual) {
    return Err(DependencyError::ChecksumMismatch {
      uri: dependency.uri.clone(),
      expected: dependency.sha256.clone(),
      actual,
    });
  }
  Ok(())
}

/// The local path a URI refers to, if it is not a remote URL.
fn local_path(uri: &str) -> Option<PathBuf> {
  if let Some(path) = uri.strip_prefix("file://") {
    return Some(PathBuf::from(path));
  }
  if uri.contains("://") {
    return None;
  }
  Some(PathBuf::from(uri))
}

fn extract_tar(reader: impl Read, dest: &Path, strip_components: usize) -> io::Result<()> {
  let mut archive = tar::Archive::new(reader);
  archive.set_preserve_permissions(true);

  for entry in archive.entries()? {
    let mut entry = entry?;
    let path = entry.path()?.into_owned();

    let stripped: PathBuf = path
      .components()
      .filter(|c| !matches!(c, Component::CurDir))
      .skip(strip_components)
      .collect();
    if stripped.as_os_str().is_empty() {
      continue;
    }
    if stripped.components().any(|c| !matches!(c, Component::Normal(_))) {
      return Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("archive entry escapes the layer: {}", path.display()),
      ));
    }

    let target = dest.join(&stripped);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    entry.unpack(&target)?;
  }

  Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
  Ok(())
}

/// Convert a URL to a safe filename.
///
/// Takes the last path component and sanitizes it. Falls back to a hash of the
/// URL if no suitable filename can be extracted.
fn url_to_filename(url: &str) -> String {
  if let Some(filename) = url.rsplit('/').next() {
    let filename = filename.split('?').next().unwrap_or(filename);

    // Sanitize: only allow alphanumeric, dash, underscore, dot
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  format!("download_{}", &hash_bytes(url.as_bytes())[..16])
}
