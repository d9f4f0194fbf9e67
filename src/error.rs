//! Startup and runtime errors
//!
//! Per-request failures never reach this type; they are turned into HTTP
//! status codes by the handler.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("root directory '{}' must be an absolute path", .0.display())]
    RelativeRoot(PathBuf),

    #[error("root directory '{}' is not accessible: {}", .path.display(), .source)]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root directory '{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
