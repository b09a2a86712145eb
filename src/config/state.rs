// Application state module
// Immutable per-process values shared by every connection

use hyper::header::HeaderValue;

use super::types::Config;
use crate::walker::ServeRoot;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in it is
/// mutated afterwards, so requests never contend on it.
pub struct AppState {
    pub config: Config,
    pub root: ServeRoot,
    pub server_header: HeaderValue,
}

impl AppState {
    pub fn new(config: Config, root: ServeRoot) -> Self {
        let server_header = HeaderValue::from_str(&config.http.server_name)
            .unwrap_or_else(|_| HeaderValue::from_static("filewalker"));

        Self {
            config,
            root,
            server_header,
        }
    }
}
