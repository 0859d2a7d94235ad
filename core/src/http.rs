//! HTTP data model for a single invocation.
//!
//! # Design
//! One `InvocationRequest` value carries every optional dimension of a call
//! (content type, auth, body, timeouts). Unset fields mean "not applied", so
//! there is exactly one entry point regardless of which options a caller
//! needs.
//!
//! The outcome is an `InvocationResult`: either the transport response or an
//! `ErrorResponse` synthesized from a failure. Both implement `Response`, so
//! callers read `status_code()` and `body()` without branching.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorResponse;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body content type. Only used as a `Content-Type` label; the body
/// itself is never encoded by the invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Json,
    Xml,
    UrlEncoded,
    FormData,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Json,
        ContentType::Xml,
        ContentType::UrlEncoded,
        ContentType::FormData,
    ];

    /// Canonical MIME string sent in the `Content-Type` header.
    pub const fn mime(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
            ContentType::UrlEncoded => "application/x-www-form-urlencoded",
            ContentType::FormData => "multipart/form-data",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// How an auth literal becomes an `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthType {
    /// `Bearer <literal>`.
    Bearer,
    /// `Basic <base64(literal)>`; the literal is expected as `user:password`.
    Basic,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Bearer => f.write_str("Bearer"),
            AuthType::Basic => f.write_str("Basic"),
        }
    }
}

/// Everything needed to perform one invocation.
///
/// Timeouts are whole seconds; zero or negative leaves the transport default
/// in place. Without any timeout a call may block indefinitely on an
/// unresponsive peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, rename = "requestTimeoutSeconds")]
    pub request_timeout: i64,
    #[serde(default, rename = "connectTimeoutSeconds")]
    pub connect_timeout: i64,
}

impl InvocationRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            content_type: None,
            url: url.into(),
            auth_type: None,
            auth_literal: None,
            body: None,
            request_timeout: 0,
            connect_timeout: 0,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn auth(mut self, auth_type: AuthType, literal: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type);
        self.auth_literal = Some(literal.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn request_timeout(mut self, seconds: i64) -> Self {
        self.request_timeout = seconds;
        self
    }

    pub fn connect_timeout(mut self, seconds: i64) -> Self {
        self.connect_timeout = seconds;
        self
    }
}

/// The observable surface shared by real and synthesized responses.
pub trait Response {
    fn status_code(&self) -> u16;
    fn body(&self) -> Cow<'_, str>;
}

/// A response received from the transport, body decoded as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Response for HttpResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn body(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.body)
    }
}

/// Outcome of `Invoke::invoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Response(HttpResponse),
    Error(ErrorResponse),
}

impl InvocationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, InvocationResult::Error(_))
    }

    pub fn into_body(self) -> String {
        match self {
            InvocationResult::Response(response) => response.body,
            InvocationResult::Error(error) => error.body().into_owned(),
        }
    }
}

impl Response for InvocationResult {
    fn status_code(&self) -> u16 {
        match self {
            InvocationResult::Response(response) => response.status_code(),
            InvocationResult::Error(error) => error.status_code(),
        }
    }

    fn body(&self) -> Cow<'_, str> {
        match self {
            InvocationResult::Response(response) => response.body(),
            InvocationResult::Error(error) => error.body(),
        }
    }
}

impl From<HttpResponse> for InvocationResult {
    fn from(response: HttpResponse) -> Self {
        InvocationResult::Response(response)
    }
}

impl From<ErrorResponse> for InvocationResult {
    fn from(error: ErrorResponse) -> Self {
        InvocationResult::Error(error)
    }
}
