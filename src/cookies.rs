//! Cookie header joining and `Set-Cookie` splitting.
//!
//! Cookies are opaque `name=value` strings. The only operations are joining
//! them into a `Cookie` request header and splitting provider `Set-Cookie`
//! values back into pieces.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, SET_COOKIE};
use tracing::warn;

use crate::constants::COOKIE_SEPARATOR;

/// A joined `Cookie` request header value.
///
/// The contents are redacted in Debug output so request spans never carry
/// session secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieHeader(String);

impl CookieHeader {
    /// Joins cookies with `"; "`, preserving order.
    #[must_use]
    pub fn join<S: AsRef<str>>(cookies: &[S]) -> Self {
        Self(
            cookies
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(COOKIE_SEPARATOR),
        )
    }

    /// Returns the raw header text.
    ///
    /// Contains session secrets; avoid logging the return value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when no cookies were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the header into a `HeaderValue`, marked sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeaderValue`] if a cookie contains bytes not allowed in headers.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&self.0)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for CookieHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CookieHeader").field(&"[REDACTED]").finish()
    }
}

/// Splits a single `Set-Cookie` value on `"; "` into pieces, in order.
///
/// Pieces are kept verbatim, attributes such as `Path=/` included.
#[must_use]
pub fn split_set_cookie(value: &str) -> Vec<String> {
    value.split(COOKIE_SEPARATOR).map(str::to_string).collect()
}

/// Collects every `Set-Cookie` header of a response, split into pieces in header order.
///
/// Values that are not valid UTF-8 are skipped with a warning.
#[must_use]
pub fn collect_set_cookies(headers: &HeaderMap) -> Vec<String> {
    let mut pieces = Vec::new();
    for value in headers.get_all(SET_COOKIE) {
        match value.to_str() {
            Ok(text) => pieces.extend(split_set_cookie(text)),
            Err(_) => warn!("skipping non-UTF-8 Set-Cookie header"),
        }
    }
    pieces
}

/// Appends provider cookies to the caller's cookies. No deduplication.
#[must_use]
pub fn merge_cookies(original: &[String], issued: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(original.len() + issued.len());
    merged.extend_from_slice(original);
    merged.extend(issued);
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_preserves_order_with_semicolon_space() {
        let header = CookieHeader::join(&["steamLoginSecure=abc", "sessionid=123", "x=y"]);
        assert_eq!(header.as_str(), "steamLoginSecure=abc; sessionid=123; x=y");
    }

    #[test]
    fn test_join_single_and_empty() {
        assert_eq!(CookieHeader::join(&["a=1"]).as_str(), "a=1");
        let empty: [&str; 0] = [];
        assert!(CookieHeader::join(&empty).is_empty());
    }

    #[test]
    fn test_debug_redacts_cookie_values() {
        let header = CookieHeader::join(&["steamLoginSecure=super-secret"]);
        let debug = format!("{header:?}");
        assert!(!debug.contains("super-secret"), "got: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_header_value_is_sensitive() {
        let value = CookieHeader::join(&["a=1"]).to_header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "a=1");
    }

    #[test]
    fn test_header_value_rejects_newlines() {
        assert!(CookieHeader::join(&["a=1\r\nX-Evil: 1"]).to_header_value().is_err());
    }

    #[test]
    fn test_split_set_cookie_keeps_pieces_in_order() {
        assert_eq!(split_set_cookie("a=1; b=2"), vec!["a=1", "b=2"]);
        assert_eq!(
            split_set_cookie("sessionid=x; Path=/; Secure"),
            vec!["sessionid=x", "Path=/", "Secure"]
        );
    }

    #[test]
    fn test_collect_set_cookies_reads_all_headers_in_order() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1; b=2"));
        headers.append(SET_COOKIE, HeaderValue::from_static("c=3"));
        assert_eq!(collect_set_cookies(&headers), vec!["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn test_collect_set_cookies_absent_header_is_empty() {
        assert!(collect_set_cookies(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_merge_appends_without_dedup() {
        let original = vec!["a=1".to_string(), "b=2".to_string()];
        let merged = merge_cookies(&original, vec!["a=9".to_string()]);
        assert_eq!(merged, vec!["a=1", "b=2", "a=9"]);
    }
}
