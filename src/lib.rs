//! Static file server for cross-origin isolated pages.
//!
//! Serves one directory over HTTP/1 and stamps every response with
//! `Access-Control-Allow-Origin: *`, `Cross-Origin-Opener-Policy: same-origin`
//! and `Cross-Origin-Embedder-Policy: require-corp`, which browsers require
//! before enabling `SharedArrayBuffer` and high-resolution timers.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config};
pub use error::ServerError;
