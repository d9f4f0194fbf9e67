// Connection handling module
// Screens the request head, then drives the connection through hyper's HTTP/1 state machine

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use super::head::{self, HeadCheck};
use super::rewind::Rewind;
use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve the request arriving on `stream`.
///
/// Each connection carries one request. Heads that fail to parse are answered
/// here with a full error page; anything else is handed to hyper together
/// with the bytes already read.
pub async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    let buffered = match head::read_head(&mut stream).await {
        Ok(HeadCheck::Ready(buffered)) => buffered,
        Ok(HeadCheck::Closed) => return,
        Ok(HeadCheck::Rejected(status, message)) => {
            logger::log_warning(&format!(
                "Rejected request from {peer_addr}: {} {message}",
                status.as_u16()
            ));
            if let Err(err) = head::write_rejection(&mut stream, status, message).await {
                logger::log_connection_error(&err);
            }
            return;
        }
        Err(err) => {
            logger::log_connection_error(&err);
            return;
        }
    };

    let io = TokioIo::new(Rewind::new(buffered, stream));
    let service = service_fn(move |req| {
        handler::handle_request(req, Arc::clone(&state), peer_addr)
    });

    // Only the screened head may reach hyper, so no second request is read
    let conn = http1::Builder::new()
        .keep_alive(false)
        .serve_connection(io, service);

    if let Err(err) = conn.await {
        // Clients hanging up mid-response are not worth a log line
        if !err.is_incomplete_message() {
            logger::log_connection_error(&err);
        }
    }
}
