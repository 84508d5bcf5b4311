//! Fully buffered HTTP response.
//!
//! Holds the final URL after redirects, the status code and reason, the response headers
//! and the raw body bytes. Header lookups through `http::HeaderMap` are case-insensitive.

use http::header::CONTENT_TYPE;
use http::HeaderMap;

#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: url::Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Reason phrase, `"Unknown"` for non-standard codes.
    pub status_text: String,

    pub headers: HeaderMap,

    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `Content-Type` header without parameters, lowercased.
    pub fn content_type(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let mime = value.split(';').next()?.trim();
        Some(mime.to_ascii_lowercase())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http::HeaderValue;

    pub(crate) fn response(status: u16, content_type: Option<&str>) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        Response {
            url: url::Url::parse("https://example.com/card.png").unwrap(),
            status,
            status_text: "OK".to_string(),
            headers,
            body: Vec::new(),
        }
    }

    #[test]
    fn success_range() {
        assert!(response(200, None).is_success());
        assert!(response(204, None).is_success());
        assert!(!response(304, None).is_success());
        assert!(!response(404, None).is_success());
    }

    #[test]
    fn content_type_strips_parameters() {
        let r = response(200, Some("Image/PNG; charset=binary"));
        assert_eq!(r.content_type().as_deref(), Some("image/png"));
        assert_eq!(response(200, None).content_type(), None);
    }
}
