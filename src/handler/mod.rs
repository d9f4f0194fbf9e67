//! Request handler module
//!
//! Maps request paths onto the base directory and produces file, index,
//! listing or error responses.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
