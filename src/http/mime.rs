//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Get MIME Content-Type for a file path
///
/// Textual types carry an explicit UTF-8 charset so browsers do not sniff.
///
/// # Examples
/// ```
/// use coi_static_server::http::mime::get_content_type;
/// use std::path::Path;
/// assert_eq!(get_content_type(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Path::new("clip.mp4")), "video/mp4");
/// assert_eq!(get_content_type(Path::new("LICENSE")), "application/octet-stream");
/// ```
pub fn get_content_type(path: &Path) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let essence = mime.essence_str();

    if mime.type_() == mime_guess::mime::TEXT || essence == "application/javascript" {
        format!("{essence}; charset=utf-8")
    } else {
        essence.to_string()
    }
}
