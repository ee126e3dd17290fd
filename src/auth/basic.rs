//! HTTP Basic credential parsing and constant-time comparison.

use axum::http::{header, HeaderMap};
use base64::Engine;

/// Parse an `Authorization: Basic <base64(user:pass)>` header.
/// Returns `None` for a missing, non-Basic, or malformed header.
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.trim();
    if !encoded[..6.min(encoded.len())].eq_ignore_ascii_case("basic ") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded[6..].trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let idx = decoded.find(':')?;
    Some((decoded[..idx].to_string(), decoded[idx + 1..].to_string()))
}

/// Constant-time string comparison to prevent timing side-channels on
/// credential checks.
///
/// Both inputs are padded to the longer length (with different pad bytes so
/// a length mismatch can never compare equal) and the length check itself
/// also runs in constant time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use base64::Engine;

    fn headers_with_basic(user: &str, pass: &str) -> HeaderMap {
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, pass));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_parse_valid_basic_header() {
        let headers = headers_with_basic("admin", "s3cret");
        assert_eq!(
            parse_basic_auth(&headers),
            Some(("admin".to_string(), "s3cret".to_string()))
        );
    }

    #[test]
    fn test_parse_password_containing_colon() {
        let headers = headers_with_basic("admin", "pa:ss:word");
        assert_eq!(
            parse_basic_auth(&headers),
            Some(("admin".to_string(), "pa:ss:word".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_header() {
        assert!(parse_basic_auth(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_parse_rejects_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer some-token"),
        );
        assert!(parse_basic_auth(&headers).is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_base64() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic not*base64!"),
        );
        assert!(parse_basic_auth(&headers).is_none());
    }

    #[test]
    fn test_parse_rejects_payload_without_colon() {
        let token = base64::engine::general_purpose::STANDARD.encode("no-separator");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
        );
        assert!(parse_basic_auth(&headers).is_none());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let token = base64::engine::general_purpose::STANDARD.encode("u:p");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("bAsIc {}", token)).unwrap(),
        );
        assert_eq!(
            parse_basic_auth(&headers),
            Some(("u".to_string(), "p".to_string()))
        );
    }

    #[test]
    fn test_constant_time_eq_matches() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_constant_time_eq_rejects_mismatch_and_prefix() {
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secre"));
        assert!(!constant_time_eq("secret", "secrets"));
        assert!(!constant_time_eq("", "x"));
    }
}
