// Signal handling module
//
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)
//
// Other platforms only get Ctrl+C.

use crate::logger;

/// Resolve once the process is asked to stop.
///
/// If no signal handler can be installed this never resolves, leaving the
/// process to run until it is killed.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let handlers = signal(SignalKind::terminate())
        .and_then(|term| signal(SignalKind::interrupt()).map(|int| (term, int)));

    match handlers {
        Ok((mut sigterm, mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => logger::log_shutdown_requested("SIGTERM"),
                _ = sigint.recv() => logger::log_shutdown_requested("SIGINT"),
            }
        }
        Err(e) => {
            logger::log_error(&format!("Failed to register signal handlers: {e}"));
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_shutdown_requested("Ctrl+C"),
        Err(e) => {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
