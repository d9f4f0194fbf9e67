// Application state module
// Immutable state shared by every connection task

use std::path::PathBuf;

use super::types::Config;
use crate::error::ServerError;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.server.root_dir`, captured once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Validate the configuration and resolve the base directory
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate()?;
        let root = config
            .server
            .root_dir
            .canonicalize()
            .map_err(|source| ServerError::RootInaccessible {
                path: config.server.root_dir.clone(),
                source,
            })?;
        Ok(Self { config, root })
    }
}
