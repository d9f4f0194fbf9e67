//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handler: response builders, MIME
//! inference, Range parsing, cache validation and the isolation headers.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use headers::{apply_isolation_headers, apply_server_header, finalize_headers};
pub use range::parse_range_header;
pub use response::{
    build_301_response, build_304_response, build_404_response, build_416_response,
    build_501_response, build_error_response,
};
