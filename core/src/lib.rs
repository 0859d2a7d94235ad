//! Configurable HTTP invocation with a fail-soft contract, plus JSON path
//! helpers for working with the responses.
//!
//! # Overview
//! Callers describe a call with one `InvocationRequest` (method, URL and any
//! of content type, auth, body and timeouts) and hand it to an `Invoke`
//! implementation. The result is always a value: a real `HttpResponse`, or
//! an `ErrorResponse` carrying status 500 and the failure message.
//!
//! # Design
//! - `resolve` maps the optional request fields to headers and timeouts.
//! - `Invoker` performs the blocking round-trip with `ureq`; certificate
//!   verification stays on unless `TrustPolicy::AcceptInvalidCerts` is
//!   chosen explicitly.
//! - `json` reads and upserts values by path, returning `None` on failure.
//! - `EmployeeDirectory` is a small consumer of both, used by `api-server`.

pub mod employees;
pub mod error;
pub mod http;
pub mod invoker;
pub mod json;
pub mod resolve;

pub use employees::EmployeeDirectory;
pub use error::{ErrorResponse, JsonPathError};
pub use http::{
    AuthType, ContentType, HttpMethod, HttpResponse, InvocationRequest, InvocationResult, Response,
};
pub use invoker::{Invoke, Invoker, TrustPolicy};
pub use json::JsonPath;
