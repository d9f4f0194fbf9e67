//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, delegation to
//! the static file routine, then the header pass every response goes through.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl<'a> RequestContext<'a> {
    fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header("if-none-match"),
            if_modified_since: header("if-modified-since"),
            range_header: header("range"),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();

    let mut response = if method == Method::GET || method == Method::HEAD {
        let ctx = RequestContext::from_request(&req);
        static_files::serve(&ctx, &state).await
    } else {
        http::build_501_response(method.as_str())
    };

    http::finalize_headers(&mut response);

    if state.config.logging.access_log {
        log_access(&req, &response, peer_addr);
    }

    Ok(response)
}

fn log_access<B>(req: &Request<B>, response: &Response<Full<Bytes>>, peer_addr: SocketAddr) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);

    logger::log_access(&entry);
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::headers::ISOLATION_HEADERS;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load().unwrap();
        cfg.server.root_dir = root.to_path_buf();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<()>) -> Response<Full<Bytes>> {
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    fn assert_isolated(resp: &Response<Full<Bytes>>) {
        for (name, value) in ISOLATION_HEADERS {
            assert_eq!(resp.headers()[name], value, "{name} on {}", resp.status());
        }
    }

    #[tokio::test]
    async fn test_serves_file_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, request(Method::GET, "/app.js")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_isolated(&resp);
        assert!(resp.headers().contains_key("last-modified"));
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"console.log(1);");
    }

    #[tokio::test]
    async fn test_every_status_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "abc").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let state = state_for(dir.path());

        let cases = [
            (request(Method::GET, "/missing"), StatusCode::NOT_FOUND),
            (request(Method::GET, "/sub"), StatusCode::MOVED_PERMANENTLY),
            (request(Method::GET, "/sub/"), StatusCode::OK),
            (request(Method::GET, "/%ff"), StatusCode::BAD_REQUEST),
            (request(Method::POST, "/a.txt"), StatusCode::NOT_IMPLEMENTED),
            (request(Method::DELETE, "/a.txt"), StatusCode::NOT_IMPLEMENTED),
        ];

        for (req, expected) in cases {
            let resp = send(&state, req).await;
            assert_eq!(resp.status(), expected);
            assert_isolated(&resp);
        }
    }

    #[tokio::test]
    async fn test_conditional_and_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.bin"), b"0123456789").unwrap();
        let state = state_for(dir.path());

        let first = send(&state, request(Method::GET, "/data.bin")).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let revalidate = Request::builder()
            .uri("/data.bin")
            .header("If-None-Match", &etag)
            .body(())
            .unwrap();
        let resp = send(&state, revalidate).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_isolated(&resp);

        let ranged = Request::builder()
            .uri("/data.bin")
            .header("Range", "bytes=-3")
            .body(())
            .unwrap();
        let resp = send(&state, ranged).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["content-range"], "bytes 7-9/10");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"789");

        let unsatisfiable = Request::builder()
            .uri("/data.bin")
            .header("Range", "bytes=50-")
            .body(())
            .unwrap();
        let resp = send(&state, unsatisfiable).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, request(Method::GET, "/docs?v=2")).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/docs/?v=2");
    }

    #[tokio::test]
    async fn test_redirect_stays_on_this_host() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("evil.example")).unwrap();
        let state = state_for(dir.path());

        for uri in ["//evil.example", "///evil.example?x=1"] {
            let resp = send(&state, request(Method::GET, uri)).await;
            assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY, "{uri}");
            let location = resp.headers()["location"].to_str().unwrap();
            assert!(location.starts_with("/evil.example/"), "{uri} -> {location}");
            assert_isolated(&resp);
        }
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "abc").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, request(Method::GET, "/a.txt/")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_outside_root_is_not_served() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("link.txt"),
        )
        .unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, request(Method::GET, "/link.txt")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_isolated(&resp);
    }

    #[test]
    fn test_version_labels() {
        assert_eq!(http_version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(http_version_label(hyper::Version::HTTP_11), "1.1");
    }
}
