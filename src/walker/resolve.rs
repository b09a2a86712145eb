//! Request path resolution
//!
//! Maps a URL path onto the served root and classifies what it points at.
//! Containment is checked twice: lexically before any filesystem access,
//! and again on the canonical path so symlinks cannot lead outside the root.

use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::error::{RootError, ServeError};
use crate::logger;

/// The validated directory all requests are resolved against
///
/// Always canonical, so it never carries a trailing separator.
#[derive(Debug, Clone)]
pub struct ServeRoot {
    path: PathBuf,
}

impl ServeRoot {
    /// Validate `path` as a root: it must exist and be a directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self, RootError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RootError::NotFound(path.to_path_buf()),
            _ => RootError::Inaccessible {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_dir() {
            return Err(RootError::NotADirectory(path.to_path_buf()));
        }
        let canonical = path.canonicalize().map_err(|e| RootError::Inaccessible {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// What a request path points at, decided once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    Directory(PathBuf),
    File(PathBuf),
    Missing,
}

/// Percent-decode the raw URI path
pub fn decode_request_path(raw: &str) -> Result<String, ServeError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ServeError::InvalidEncoding(raw.to_string()))
}

/// Resolve a decoded request path (always starting with `/`) under `root`
pub async fn resolve(root: &ServeRoot, request_path: &str) -> Result<ResolvedTarget, ServeError> {
    let relative = Path::new(request_path.trim_start_matches('/'));

    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return Err(ServeError::Forbidden(request_path.to_string()));
    }

    let candidate = root.path.join(relative);

    let metadata = match fs::metadata(&candidate).await {
        Ok(m) => m,
        Err(e) if is_missing(&e) => return Ok(ResolvedTarget::Missing),
        Err(e) => return Err(e.into()),
    };

    let canonical = match fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(e) if is_missing(&e) => return Ok(ResolvedTarget::Missing),
        Err(e) => return Err(e.into()),
    };
    if !canonical.starts_with(&root.path) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return Err(ServeError::Forbidden(request_path.to_string()));
    }

    if metadata.is_dir() {
        Ok(ResolvedTarget::Directory(canonical))
    } else if metadata.is_file() {
        Ok(ResolvedTarget::File(canonical))
    } else {
        // FIFOs, sockets and devices are never served
        Ok(ResolvedTarget::Missing)
    }
}

/// Lookup failures that mean "nothing servable here" rather than a server fault
fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput
    ) || is_unresolvable_name(err)
}

// Overlong names and symlink loops
#[cfg(unix)]
fn is_unresolvable_name(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::ENAMETOOLONG | libc::ELOOP))
}

#[cfg(not(unix))]
fn is_unresolvable_name(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::InvalidFilename
}
