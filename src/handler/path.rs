//! Request path decoding
//!
//! Turns the raw URI path into a relative filesystem path that cannot climb
//! above the base directory.

use std::path::{Path, PathBuf};

/// A decoded request path, ready to be joined under the base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Percent-decoded path as the client sent it, used for display
    pub decoded: String,
    /// Normalised relative path with no `.`/`..` components
    pub relative: PathBuf,
    /// Whether the client asked for a directory (`/docs/` rather than `/docs`)
    pub trailing_slash: bool,
}

impl RequestTarget {
    /// Location of this target under `root`
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.relative)
    }
}

/// Decode and normalise a raw URI path
///
/// `..` removes the previous segment and is dropped at the top, so the
/// result always stays below whatever directory it is joined to. Returns
/// `None` when the percent-decoded bytes are not valid UTF-8.
pub fn decode_request_path(raw_path: &str) -> Option<RequestTarget> {
    let decoded = urlencoding::decode(raw_path).ok()?.into_owned();
    let trailing_slash = decoded.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains('\\') || s.contains('\0') => {}
            s => segments.push(s),
        }
    }

    let relative = segments.iter().collect::<PathBuf>();
    Some(RequestTarget {
        decoded,
        relative,
        trailing_slash,
    })
}

/// Canonicalize `path` and return it only if it still lives under `root`
///
/// `root` must already be canonical. Symlinks pointing outside fail the check.
pub async fn contained(root: &Path, path: &Path) -> Option<PathBuf> {
    let canonical = tokio::fs::canonicalize(path).await.ok()?;
    if canonical.starts_with(root) {
        Some(canonical)
    } else {
        crate::logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path.display(),
            canonical.display()
        ));
        None
    }
}
