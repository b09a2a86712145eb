// Server loop module
// Accepts connections until shutdown is signalled, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on `listener` until `shutdown` is notified
///
/// After shutdown the listener is closed and open connections are asked to
/// close once their current response is done. They get
/// `performance.shutdown_grace_period` seconds for that.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (closing_tx, closing_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &closing_rx,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    drop(listener);
    closing_tx.send_replace(true);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    drain(&active_connections, grace).await;
    Ok(())
}

/// Wait for the active connection count to reach zero, at most `grace`
async fn drain(active: &AtomicUsize, grace: Duration) {
    logger::log_shutdown_started(active.load(Ordering::SeqCst));

    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_shutdown_complete();
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_shutdown_timeout(remaining);
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
