//! Inbound query normalization
//!
//! Pagination input coming from end users is never rejected: anything that
//! does not make sense is clamped or replaced by a default so the listing
//! still renders.

use super::Query;

/// Page size used when the caller sends nothing usable
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Largest page size the upstream is asked for
pub const MAX_PER_PAGE: u32 = 50;

/// Normalizes raw inbound parameters with the standard default page size
pub fn normalize(
    raw_search: Option<&str>,
    raw_page: Option<&str>,
    raw_per_page: Option<&str>,
) -> Query {
    normalize_with_default(raw_search, raw_page, raw_per_page, DEFAULT_PER_PAGE)
}

/// Normalizes raw inbound parameters
///
/// * `search` is trimmed; empty means no filter.
/// * `page` below 1 (or unparseable) becomes 1.
/// * `per_page` below 1 (or unparseable) becomes `default_per_page`, above
///   [`MAX_PER_PAGE`] becomes [`MAX_PER_PAGE`].
pub fn normalize_with_default(
    raw_search: Option<&str>,
    raw_page: Option<&str>,
    raw_per_page: Option<&str>,
    default_per_page: u32,
) -> Query {
    let search = raw_search.map(str::trim).unwrap_or_default();

    let page = raw_page
        .and_then(coerce_int)
        .filter(|page| *page >= 1)
        .map_or(1, |page| page.unsigned_abs());

    let default_per_page = default_per_page.clamp(1, MAX_PER_PAGE);
    let per_page = match raw_per_page.and_then(coerce_int) {
        Some(n) if n < 1 => default_per_page,
        Some(n) if n > i64::from(MAX_PER_PAGE) => MAX_PER_PAGE,
        Some(n) => n as u32,
        None => default_per_page,
    };

    Query::new(search, page, per_page)
}

/// Reads the leading integer of a string
///
/// Leading whitespace and a single sign are accepted, parsing stops at the
/// first non-digit (`"12abc"` is 12, `"2.9"` is 2). Returns `None` when no
/// digits are present. Values beyond `i64` saturate.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value = rest[..digits_len].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });

    Some(if negative { -value } else { value })
}
