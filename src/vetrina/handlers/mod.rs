pub mod health;
pub use self::health::health;

pub mod pages;

// common functions for the handlers
use crate::session::ForwardedCookie;
use axum::http::{header::COOKIE, HeaderMap};

/// Cookie header of the incoming page request, forwarded verbatim to the
/// identity probe. Server-rendered evaluations have no ambient cookie jar.
#[must_use]
pub fn forwarded_cookie(headers: &HeaderMap) -> Option<ForwardedCookie> {
    headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ForwardedCookie::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_cookie_trims_the_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("  session=abc  "));
        assert_eq!(
            forwarded_cookie(&headers).map(|c| c.header_value().to_string()),
            Some("session=abc".to_string())
        );
    }

    #[test]
    fn missing_or_empty_cookie_means_none() {
        assert!(forwarded_cookie(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("   "));
        assert!(forwarded_cookie(&headers).is_none());
    }
}
