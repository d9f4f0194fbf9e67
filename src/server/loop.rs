// Server loop module
// Accepts connections until shutdown, then drains the ones still open

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections until `shutdown` resolves.
///
/// Each connection runs in its own task, so a slow client never holds up
/// another. After shutdown the listener is closed first, then open
/// connections get `server.shutdown_timeout` seconds before being aborted.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connections.spawn(handle_connection(stream, peer_addr, Arc::clone(&state)));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            Some(finished) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = finished {
                    if e.is_panic() {
                        logger::log_error(&format!("Connection task panicked: {e}"));
                    }
                }
            }
        }
    }

    drop(listener);
    drain(&mut connections, Duration::from_secs(state.config.server.shutdown_timeout)).await;
}

/// Wait for open connections, aborting whatever is left after `grace`
async fn drain(connections: &mut JoinSet<()>, grace: Duration) {
    let all_done = async {
        while connections.join_next().await.is_some() {}
    };

    if tokio::time::timeout(grace, all_done).await.is_err() {
        let remaining = connections.len();
        connections.abort_all();
        logger::log_shutdown_complete(remaining);
    }
}
