//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, path decoding,
//! resolution against the served root, and dispatch on the target kind.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};

use super::{download, index};
use crate::config::AppState;
use crate::error::ServeError;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::walker::{decode_request_path, resolve, ResolvedTarget};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();

    let mut response = route(req.method(), req.uri().path(), &state).await;
    response
        .headers_mut()
        .insert(SERVER, state.server_header.clone());

    if state.config.logging.access_log {
        log_access(&req, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Pick the response for one request
async fn route(method: &Method, raw_path: &str, state: &AppState) -> Response<ResponseBody> {
    if method != Method::GET {
        logger::log_warning(&format!("Method not allowed: {method} {raw_path}"));
        return http::build_405_response();
    }

    let decoded = match decode_request_path(raw_path) {
        Ok(p) => p,
        Err(e) => return http::build_error_response(&e),
    };
    logger::log_request_path(&decoded);

    match resolve(&state.root, &decoded).await {
        Ok(ResolvedTarget::Directory(dir)) => index::serve_index(&decoded, &dir).await,
        Ok(ResolvedTarget::File(path)) => {
            download::serve_file(&path, state.config.serve.chunk_size).await
        }
        Ok(ResolvedTarget::Missing) => {
            http::build_error_response(&ServeError::PathNotFound(decoded))
        }
        Err(e) => {
            if let ServeError::Io(ref io) = e {
                logger::log_error(&format!("Failed to resolve '{decoded}': {io}"));
            }
            http::build_error_response(&e)
        }
    }
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), ToString::to_string),
    );
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};
    use crate::walker::ServeRoot;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn state_for(dir: &TempDir) -> Arc<AppState> {
        let mut config = Config::load_from(
            &dir.path().join("no-config").to_string_lossy(),
            &Overrides::default(),
        )
        .unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, ServeRoot::new(dir.path()).unwrap()))
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let req = Request::get(uri).body(()).unwrap();
        let resp = handle_request(req, Arc::clone(state), "127.0.0.1:4000".parse().unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_missing_path_is_400_naming_path() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let (status, body) = get(&state, "/missing%20file.txt").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("/missing file.txt"));
    }

    #[tokio::test]
    async fn test_overlong_name_is_400() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);
        let name = "a".repeat(300);

        let (status, body) = get(&state, &format!("/{name}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(&name));
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let req = Request::post("/").body(()).unwrap();
        let resp = handle_request(req, state, "127.0.0.1:4000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_bad_encoding_is_400() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let (status, _) = get(&state, "/%ff").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_forbidden() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let (status, _) = get(&state, "/%2e%2e/%2e%2e/etc/passwd").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_server_header_is_set() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let req = Request::get("/").body(()).unwrap();
        let resp = handle_request(req, state, "127.0.0.1:4000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(resp.headers()[SERVER], "filewalker");
    }
}
