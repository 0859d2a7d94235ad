//! Turns the optional fields of an `InvocationRequest` into concrete headers
//! and transport settings.
//!
//! Every resolver answers `None` for "leave this unset": no header is
//! emitted and no timeout is applied. None of them fail.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::http::{AuthType, ContentType, InvocationRequest};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";

/// MIME string for the `Content-Type` header.
pub fn content_type(content_type: Option<ContentType>) -> Option<&'static str> {
    content_type.map(ContentType::mime)
}

/// `Authorization` header value for an auth type and literal.
///
/// The literal is not validated: for `Basic` it is encoded as given, so the
/// caller supplies `user:password`. A missing type, a missing literal or an
/// empty literal yields no header.
pub fn auth_header_value(auth_type: Option<AuthType>, literal: Option<&str>) -> Option<String> {
    let literal = literal.filter(|l| !l.is_empty())?;
    match auth_type? {
        AuthType::Basic => Some(format!("Basic {}", STANDARD.encode(literal))),
        AuthType::Bearer => Some(format!("Bearer {literal}")),
    }
}

/// Seconds to a timeout; zero or negative means "use the transport default".
pub fn timeout(seconds: i64) -> Option<Duration> {
    u64::try_from(seconds)
        .ok()
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
}

/// Headers to set on the outgoing request, in send order.
pub fn headers(request: &InvocationRequest) -> Vec<(&'static str, String)> {
    let mut headers = Vec::with_capacity(2);
    if let Some(mime) = content_type(request.content_type) {
        headers.push((CONTENT_TYPE, mime.to_string()));
    }
    if let Some(value) = auth_header_value(request.auth_type, request.auth_literal.as_deref()) {
        headers.push((AUTHORIZATION, value));
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_map_to_mime_strings() {
        let expected = [
            (ContentType::Json, "application/json"),
            (ContentType::Xml, "application/xml"),
            (ContentType::UrlEncoded, "application/x-www-form-urlencoded"),
            (ContentType::FormData, "multipart/form-data"),
        ];
        for (ct, mime) in expected {
            assert_eq!(content_type(Some(ct)), Some(mime), "{ct:?}");
        }
        assert_eq!(ContentType::ALL.len(), expected.len());
    }

    #[test]
    fn absent_content_type_sets_nothing() {
        assert_eq!(content_type(None), None);
    }

    #[test]
    fn basic_auth_is_base64_encoded() {
        assert_eq!(
            auth_header_value(Some(AuthType::Basic), Some("user:pass")).as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn bearer_auth_passes_literal_through() {
        assert_eq!(
            auth_header_value(Some(AuthType::Bearer), Some("tok123")).as_deref(),
            Some("Bearer tok123")
        );
    }

    #[test]
    fn literal_without_type_is_ignored() {
        assert_eq!(auth_header_value(None, Some("tok123")), None);
    }

    #[test]
    fn type_without_literal_yields_no_header() {
        assert_eq!(auth_header_value(Some(AuthType::Basic), None), None);
        assert_eq!(auth_header_value(Some(AuthType::Bearer), None), None);
        assert_eq!(auth_header_value(Some(AuthType::Bearer), Some("")), None);
    }

    #[test]
    fn non_positive_timeouts_are_unset() {
        assert_eq!(timeout(0), None);
        assert_eq!(timeout(-5), None);
        assert_eq!(timeout(3), Some(Duration::from_secs(3)));
    }

    #[test]
    fn headers_follow_request_options() {
        let bare = InvocationRequest::get("http://localhost");
        assert!(headers(&bare).is_empty());

        let full = InvocationRequest::post("http://localhost")
            .content_type(ContentType::Xml)
            .auth(AuthType::Bearer, "abc");
        assert_eq!(
            headers(&full),
            vec![
                (CONTENT_TYPE, "application/xml".to_string()),
                (AUTHORIZATION, "Bearer abc".to_string()),
            ]
        );
    }
}
