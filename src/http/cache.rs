//! HTTP cache validation module
//!
//! Provides `ETag`/`Last-Modified` generation and conditional request handling.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Validators describing one version of a file on disk
#[derive(Debug, Clone)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Validators {
    /// Derive validators from file metadata (modification time and size)
    pub fn from_metadata(modified: Option<SystemTime>, size: u64) -> Self {
        let mtime_secs = modified
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs());

        Self {
            etag: format!("W/\"{mtime_secs:x}-{size:x}\""),
            last_modified: modified.map(DateTime::<Utc>::from),
        }
    }

    /// `Last-Modified` header value
    pub fn last_modified_header(&self) -> Option<String> {
        self.last_modified.map(format_http_date)
    }

    /// Whether the request's conditional headers allow a 304 response
    ///
    /// `If-Modified-Since` is only consulted when `If-None-Match` is absent.
    pub fn is_not_modified(
        &self,
        if_none_match: Option<&str>,
        if_modified_since: Option<&str>,
    ) -> bool {
        if let Some(tags) = if_none_match {
            return check_etag_match(tags, &self.etag);
        }

        match (if_modified_since.and_then(parse_http_date), self.last_modified) {
            (Some(since), Some(modified)) => modified.timestamp() <= since.timestamp(),
            _ => false,
        }
    }
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Uses weak comparison, so `W/"x"` and `"x"` are equal. Supports lists and `*`.
pub fn check_etag_match(if_none_match: &str, etag: &str) -> bool {
    let ours = etag.trim_start_matches("W/");
    if_none_match.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || candidate.trim_start_matches("W/") == ours
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_etag_from_metadata() {
        let v = Validators::from_metadata(Some(at(0x10)), 0x20);
        assert_eq!(v.etag, "W/\"10-20\"");

        let other = Validators::from_metadata(Some(at(0x10)), 0x21);
        assert_ne!(v.etag, other.etag);
    }

    #[test]
    fn test_http_date_round_trip() {
        let v = Validators::from_metadata(Some(at(784_111_777)), 1);
        let header = v.last_modified_header().unwrap();
        assert_eq!(header, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_http_date(&header).unwrap().timestamp(), 784_111_777);
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "W/\"abc\"";
        assert!(check_etag_match("W/\"abc\"", etag));
        assert!(check_etag_match("\"abc\"", etag));
        assert!(check_etag_match("\"xyz\", W/\"abc\"", etag));
        assert!(check_etag_match("*", etag));
        assert!(!check_etag_match("\"different\"", etag));
    }

    #[test]
    fn test_if_modified_since() {
        let v = Validators::from_metadata(Some(at(784_111_777)), 1);
        assert!(v.is_not_modified(None, Some("Sun, 06 Nov 1994 08:49:37 GMT")));
        assert!(v.is_not_modified(None, Some("Mon, 07 Nov 1994 00:00:00 GMT")));
        assert!(!v.is_not_modified(None, Some("Sat, 05 Nov 1994 00:00:00 GMT")));
        assert!(!v.is_not_modified(None, Some("garbage")));
        assert!(!v.is_not_modified(None, None));
    }

    #[test]
    fn test_if_none_match_takes_precedence() {
        let v = Validators::from_metadata(Some(at(784_111_777)), 1);
        // Date would match, but the entity tag does not
        assert!(!v.is_not_modified(
            Some("\"other\""),
            Some("Mon, 07 Nov 1994 00:00:00 GMT")
        ));
    }
}
