// Request head screening
// Reads the request head off the socket before hyper takes the connection, so
// heads hyper would refuse still get an error page with the isolation headers

use chrono::Utc;
use hyper::header::{HeaderValue, CONNECTION, DATE};
use hyper::StatusCode;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::{self, cache};

/// Largest request head accepted, in bytes
pub const MAX_HEAD_SIZE: usize = 64 * 1024;
/// Most header fields accepted in one request
pub const MAX_HEADERS: usize = 100;

/// How long a rejected client gets to stop sending before the socket closes
const LINGER: Duration = Duration::from_secs(2);

/// Result of screening the start of a connection
#[derive(Debug)]
pub enum HeadCheck {
    /// A complete, parseable head; carries every byte read so far
    Ready(Vec<u8>),
    /// The head must be answered with this status and message
    Rejected(StatusCode, &'static str),
    /// The peer closed before sending anything
    Closed,
}

#[derive(Debug, PartialEq, Eq)]
enum Inspection {
    Complete,
    Partial,
    Invalid(StatusCode, &'static str),
}

/// Read until the request head is complete, invalid or too large
pub async fn read_head(stream: &mut TcpStream) -> io::Result<HeadCheck> {
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(if buf.is_empty() {
                HeadCheck::Closed
            } else {
                HeadCheck::Rejected(StatusCode::BAD_REQUEST, "Incomplete request")
            });
        }
        buf.extend_from_slice(&chunk[..n]);

        match inspect(&buf) {
            Inspection::Complete => return Ok(HeadCheck::Ready(buf)),
            Inspection::Partial => {}
            Inspection::Invalid(status, message) => {
                return Ok(HeadCheck::Rejected(status, message))
            }
        }
    }
}

fn inspect(buf: &[u8]) -> Inspection {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    match req.parse(buf) {
        Ok(httparse::Status::Complete(len)) if len > MAX_HEAD_SIZE => too_large(),
        Ok(httparse::Status::Complete(_)) => Inspection::Complete,
        Ok(httparse::Status::Partial) if buf.len() >= MAX_HEAD_SIZE => too_large(),
        Ok(httparse::Status::Partial) => Inspection::Partial,
        Err(httparse::Error::TooManyHeaders) => too_large(),
        Err(_) => Inspection::Invalid(StatusCode::BAD_REQUEST, "Bad request syntax"),
    }
}

const fn too_large() -> Inspection {
    Inspection::Invalid(
        StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
        "Request header fields too large",
    )
}

/// Answer a rejected head, then close the connection
pub async fn write_rejection(
    stream: &mut TcpStream,
    status: StatusCode,
    message: &str,
) -> io::Result<()> {
    let mut response = http::build_error_response(status, message, false);
    http::finalize_headers(&mut response);
    let headers = response.headers_mut();
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    if let Ok(date) = HeaderValue::from_str(&cache::format_http_date(Utc::now())) {
        headers.insert(DATE, date);
    }

    stream.write_all(&http::response::encode_http1(response).await).await?;
    stream.shutdown().await?;
    linger(stream).await;
    Ok(())
}

/// Drain what the client is still sending so closing does not reset the
/// connection before the response is read
async fn linger(stream: &mut TcpStream) {
    let mut sink = [0u8; 4096];
    let drain = async {
        while let Ok(n) = stream.read(&mut sink).await {
            if n == 0 {
                break;
            }
        }
    };
    let _ = tokio::time::timeout(LINGER, drain).await;
}
