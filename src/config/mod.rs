// Configuration module entry point
// Builds the immutable startup configuration and the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig};

/// Listen on all interfaces
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Fixed listen port
pub const DEFAULT_PORT: u16 = 8081;
/// Fixed base directory all requests are served from
pub const DEFAULT_ROOT_DIR: &str = "/srv/web-tools";
/// Seconds open connections get after a shutdown signal
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 5;

impl Config {
    /// Build the configuration from the compiled-in defaults.
    ///
    /// There are no flags, files or environment variables to read.
    pub fn load() -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root_dir", DEFAULT_ROOT_DIR)?
            .set_default("server.shutdown_timeout", DEFAULT_SHUTDOWN_TIMEOUT)?
            .set_default("logging.access_log", true)?
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.server.host, self.server.port))
            })
    }

    /// Check everything that must hold before the listener binds
    pub fn validate(&self) -> Result<(), ServerError> {
        self.get_socket_addr()?;
        validate_root_dir(&self.server.root_dir)
    }
}

fn validate_root_dir(root: &Path) -> Result<(), ServerError> {
    if !root.is_absolute() {
        return Err(ServerError::RelativeRoot(root.to_path_buf()));
    }

    let metadata = std::fs::metadata(root).map_err(|source| ServerError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ServerError::RootNotDirectory(root.to_path_buf()));
    }

    // Listing proves the directory is readable, not just present
    std::fs::read_dir(root).map_err(|source| ServerError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}
