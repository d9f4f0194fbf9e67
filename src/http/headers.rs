//! Cross-origin isolation headers
//!
//! Applied to every response after the handler has built it. Browsers only
//! grant `SharedArrayBuffer` and precise timers to documents served with the
//! COOP/COEP pair.

use hyper::header::{HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::Response;

/// The three headers every response carries, with their exact values
pub const ISOLATION_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
];

/// Add (or overwrite) the isolation headers on a finished response
pub fn apply_isolation_headers<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("require-corp"),
    );
}

/// Value of the `Server` header
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Set the `Server` header unless the handler already chose one
pub fn apply_server_header<B>(response: &mut Response<B>) {
    response
        .headers_mut()
        .entry(SERVER)
        .or_insert(HeaderValue::from_static(SERVER_NAME));
}

/// The final pass every outgoing response goes through
pub fn finalize_headers<B>(response: &mut Response<B>) {
    apply_isolation_headers(response);
    apply_server_header(response);
}
