// Server loop module
// Accepts connections until shutdown, then drains in-flight requests

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain loop re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `state.shutdown` is notified.
///
/// Must run inside a `tokio::task::LocalSet`, since connections are served
/// with `spawn_local`. After shutdown the listener is closed, open connections
/// are told to close once their current request is answered, and the loop
/// waits up to `performance.shutdown_grace_period` seconds for open
/// connections (for example requests still sleeping on a delay) to finish.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = state.shutdown.notified() => break,
        }
    }

    drop(listener);
    state.begin_close();

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    logger::log_shutdown_started(state.connection_count(), grace.as_secs());
    let remaining = drain_connections(&state, grace).await;
    logger::log_shutdown_complete(remaining);

    Ok(())
}

/// Wait until no connections are open or the grace period runs out.
///
/// Returns the number of connections still open.
pub async fn drain_connections(state: &AppState, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let open = state.connection_count();
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {}
        }
    }
}
