// Connection handling module
// Accepts a TCP connection and serves its requests in a spawned task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Decrements the active connection count when the connection task ends,
/// however it ends
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, enforcing the connection limit
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `active` - Active connection counter
/// * `closing` - Flips to `true` when the server starts shutting down
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active: &Arc<AtomicUsize>,
    closing: &watch::Receiver<bool>,
) {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let prev_count = active.fetch_add(1, Ordering::SeqCst);
    let guard = ConnectionGuard(Arc::clone(active));

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    tokio::spawn(serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        closing.clone(),
        guard,
    ));
}

/// Serve every request on one connection
///
/// Only header reads are time-limited; a slow download is never cut off.
/// On shutdown an idle keep-alive connection is closed at once and a busy
/// one after its current response.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    mut closing: watch::Receiver<bool>,
    _guard: ConnectionGuard,
) {
    let io = TokioIo::new(stream);
    let perf = &state.config.performance;

    // A read_timeout of 0 turns the header timeout off
    let mut builder = http1::Builder::new();
    builder
        .keep_alive(perf.keep_alive_timeout > 0)
        .timer(TokioTimer::new())
        .header_read_timeout((perf.read_timeout > 0).then(|| Duration::from_secs(perf.read_timeout)));

    let service_state = Arc::clone(&state);
    let service = service_fn(move |req| {
        handler::handle_request(req, Arc::clone(&service_state), peer_addr)
    });

    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    let result = tokio::select! {
        res = conn.as_mut() => res,
        _ = closing.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(err) = result {
        logger::log_connection_error(&err);
    }
}
