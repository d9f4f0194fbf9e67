//! HTTP Range request parsing module
//!
//! Single byte-range support for `Range: bytes=...` (RFC 9110 section 14).

/// A resolved, inclusive byte range inside a body of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// `Content-Range` header value for this range
    pub fn content_range(&self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Satisfiable range, already clamped to the body length
    Valid(ByteRange),
    /// Range cannot be satisfied - respond 416
    NotSatisfiable,
    /// No Range header, unknown unit, multi-range or malformed: serve everything
    None,
}

/// Parse an HTTP Range header against a body of `total` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// # Examples
/// ```
/// use coi_static_server::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=0-99"), 1000),
///     RangeParseResult::Valid(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 1000), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, total: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };

    if spec.contains(',') {
        return RangeParseResult::None;
    }

    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => parse_suffix(suffix, total),
        (start, end) => parse_bounded(start, end, total),
    }
}

/// `-N`: the last N bytes
fn parse_suffix(suffix: &str, total: usize) -> RangeParseResult {
    let Ok(n) = suffix.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if n == 0 || total == 0 {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange {
        start: total.saturating_sub(n),
        end: total - 1,
    })
}

/// `S-` or `S-E`
fn parse_bounded(start: &str, end: &str, total: usize) -> RangeParseResult {
    let Ok(start) = start.parse::<usize>() else {
        return RangeParseResult::None;
    };

    let end = if end.is_empty() {
        None
    } else {
        match end.parse::<usize>() {
            Ok(e) => Some(e),
            Err(_) => return RangeParseResult::None,
        }
    };

    if let Some(e) = end {
        if e < start {
            return RangeParseResult::None;
        }
    }

    if start >= total {
        return RangeParseResult::NotSatisfiable;
    }

    let last = total - 1;
    RangeParseResult::Valid(ByteRange {
        start,
        end: end.map_or(last, |e| e.min(last)),
    })
}
