//! Static file serving module
//!
//! Resolves a request under the base directory and builds the file, index,
//! listing or error response for it.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::path::{self, RequestTarget};
use crate::handler::router::RequestContext;
use crate::http::{self, cache::Validators, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;
use std::path::Path;
use tokio::fs;

/// Files tried, in order, when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve whatever the request path names under the base directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(target) = path::decode_request_path(ctx.path) else {
        return http::build_error_response(StatusCode::BAD_REQUEST, "Bad request path", ctx.is_head);
    };

    let candidate = target.under(&state.root);
    let metadata = match fs::metadata(&candidate).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return forbidden(ctx.is_head);
        }
        Err(_) => return http::build_404_response(ctx.is_head),
    };

    let Some(resolved) = path::contained(&state.root, &candidate).await else {
        return http::build_404_response(ctx.is_head);
    };

    if metadata.is_dir() {
        serve_directory(ctx, state, &target, &resolved).await
    } else if target.trailing_slash {
        // A file addressed like a directory
        http::build_404_response(ctx.is_head)
    } else {
        serve_file(ctx, &resolved).await
    }
}

/// Redirect to the slash form, then serve an index file or a listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    target: &RequestTarget,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !target.trailing_slash {
        // A Location starting with "//" would name another host
        let path = format!("/{}", ctx.path.trim_start_matches('/'));
        let location = match ctx.query {
            Some(q) => format!("{path}/?{q}"),
            None => format!("{path}/"),
        };
        return http::build_301_response(&location);
    }

    for index_file in INDEX_FILES {
        let index_path = dir.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            if let Some(resolved) = path::contained(&state.root, &index_path).await {
                return serve_file(ctx, &resolved).await;
            }
        }
    }

    list_directory(dir, &target.decoded, ctx.is_head).await
}

/// Render the listing of `dir`, titled with the decoded request path
async fn list_directory(dir: &Path, display_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match listing::read_entries(dir).await {
        Ok(entries) => http::response::build_html_response(
            listing::render_listing(display_path, &entries),
            is_head,
        ),
        Err(e) => io_error_response(&e, dir, is_head),
    }
}

/// Serve a regular file with conditional and Range support
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let (content, validators) = match load_file(file_path).await {
        Ok(loaded) => loaded,
        Err(e) => return io_error_response(&e, file_path, ctx.is_head),
    };

    if validators.is_not_modified(ctx.if_none_match.as_deref(), ctx.if_modified_since.as_deref()) {
        return http::build_304_response(&validators);
    }

    let content_type = mime::get_content_type(file_path);

    match http::parse_range_header(ctx.range_header.as_deref(), content.len()) {
        RangeParseResult::Valid(range) => http::response::build_partial_response(
            &content,
            range,
            &content_type,
            &validators,
            ctx.is_head,
        ),
        RangeParseResult::NotSatisfiable => http::build_416_response(content.len()),
        RangeParseResult::None => {
            http::response::build_file_response(content, &content_type, &validators, ctx.is_head)
        }
    }
}

/// Read file bytes together with the validators for this version of it
async fn load_file(file_path: &Path) -> io::Result<(Bytes, Validators)> {
    let content = fs::read(file_path).await?;
    let metadata = fs::metadata(file_path).await?;
    let validators = Validators::from_metadata(metadata.modified().ok(), metadata.len());
    Ok((Bytes::from(content), validators))
}

/// Map a filesystem error on `path` to a response
fn io_error_response(error: &io::Error, path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match error.kind() {
        io::ErrorKind::NotFound => http::build_404_response(is_head),
        io::ErrorKind::PermissionDenied => forbidden(is_head),
        _ => {
            logger::log_error(&format!("Failed to read '{}': {error}", path.display()));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                is_head,
            )
        }
    }
}

fn forbidden(is_head: bool) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::FORBIDDEN, "Permission denied", is_head)
}
