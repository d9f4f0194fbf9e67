//! Logger module
//!
//! Logging utilities for the file server:
//! - Startup banner and shutdown messages on stdout
//! - One Common Log Format line per request on stderr
//! - Error and warning lines on stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// The single startup line announcing where the server can be reached
pub fn log_server_start(addr: &SocketAddr) {
    println!(
        "Serving at port http://localhost:{} with CORS and Isolation headers",
        addr.port()
    );
}

pub fn log_shutdown_requested(signal: &str) {
    println!("Received {signal}, shutting down");
}

pub fn log_shutdown_complete(aborted: usize) {
    if aborted > 0 {
        log_warning(&format!(
            "Shutdown timeout reached, aborted {aborted} open connection(s)"
        ));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    eprintln!("[ERROR] Failed to serve connection: {err}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

/// Log one served request
pub fn log_access(entry: &AccessLogEntry) {
    eprintln!("{}", entry.common_log_line());
}
