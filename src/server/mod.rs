// Server module entry point
// Listener setup, accept loop, request head screening, per-connection serving and shutdown signals

pub mod connection;
pub mod head;
pub mod listener;
pub mod rewind;
pub mod signal;

// `loop` is a keyword, so the module gets a different name
#[path = "loop.rs"]
pub mod server_loop;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::ServerError;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::serve;
pub use signal::shutdown_signal;

/// Bind the listener for `config`, failing fast if the port is taken
pub fn bind(config: &Config) -> Result<TcpListener, ServerError> {
    create_listener(config.get_socket_addr()?)
}
