//! Error types
//!
//! `RootError` is fatal and only produced at startup. `ServeError` is scoped
//! to a single request and always maps to one HTTP status code.

use std::io;
use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

/// The configured root cannot be served
#[derive(Debug, Error)]
pub enum RootError {
    #[error("root path [{}] does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("root path [{}] is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("root path [{}] is not accessible: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-request failure
#[derive(Debug, Error)]
pub enum ServeError {
    /// Percent-decoding failed or produced invalid UTF-8
    #[error("Requested path [{0}] is not valid UTF-8")]
    InvalidEncoding(String),

    /// Nothing servable exists at the decoded path
    #[error("Requested path [{0}] does not exist")]
    PathNotFound(String),

    /// The decoded path would leave the served root
    #[error("Requested path [{0}] is outside the served directory")]
    Forbidden(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEncoding(_) | Self::PathNotFound(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
