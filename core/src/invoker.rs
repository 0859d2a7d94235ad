//! Synchronous HTTP invoker with a fail-soft contract.
//!
//! # Design
//! `Invoker::invoke` never returns an error to its caller. Invalid URLs,
//! connection failures, TLS failures and timeouts are all converted into an
//! `ErrorResponse` with status 500 and the transport's message. Non-2xx
//! statuses from the server are not failures; they come back as ordinary
//! `HttpResponse`s. Redirects are not followed; a 3xx is returned as is.
//!
//! A new `ureq` agent is built for every call, so the invoker holds no
//! connection state and can be shared freely between threads. The call
//! blocks the current thread until the response body has been read.

use std::sync::Arc;

use tracing::{debug, warn};
use ureq::tls::TlsConfig;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::ErrorResponse;
use crate::http::{HttpMethod, HttpResponse, InvocationRequest, InvocationResult};
use crate::resolve;

/// Anything that can perform an invocation.
///
/// `EmployeeDirectory` and other callers depend on this rather than on
/// `Invoker` directly.
pub trait Invoke {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResult;
}

impl<T: Invoke + ?Sized> Invoke for &T {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        (**self).invoke(request)
    }
}

impl<T: Invoke + ?Sized> Invoke for Arc<T> {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        (**self).invoke(request)
    }
}

/// Server certificate trust policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrustPolicy {
    /// Validate certificate chain and hostname.
    #[default]
    Verify,
    /// Accept any certificate for any host. Only for development endpoints
    /// with self-signed or misconfigured certificates.
    AcceptInvalidCerts,
}

/// The `ureq`-backed invoker.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    trust: TrustPolicy,
}

impl Invoker {
    /// An invoker that validates server certificates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trust_policy(trust: TrustPolicy) -> Self {
        Self { trust }
    }

    pub fn trust_policy(&self) -> TrustPolicy {
        self.trust
    }

    fn agent(&self, request: &InvocationRequest) -> Agent {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_connect(resolve::timeout(request.connect_timeout))
            .timeout_global(resolve::timeout(request.request_timeout));
        if self.trust == TrustPolicy::AcceptInvalidCerts {
            config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        config.build().new_agent()
    }

    fn send(&self, request: &InvocationRequest) -> Result<HttpResponse, ureq::Error> {
        let agent = self.agent(request);
        let headers = resolve::headers(request);
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let mut response = match request.method {
            HttpMethod::Get => send_without_body(apply_headers(agent.get(url), &headers), body)?,
            HttpMethod::Delete => {
                send_without_body(apply_headers(agent.delete(url), &headers), body)?
            }
            HttpMethod::Post => send_with_body(apply_headers(agent.post(url), &headers), body)?,
            HttpMethod::Put => send_with_body(apply_headers(agent.put(url), &headers), body)?,
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Invoke for Invoker {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        debug!(method = %request.method, url = %request.url, "invoking");
        match self.send(request) {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "invocation completed");
                InvocationResult::Response(response)
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "invocation failed");
                InvocationResult::Error(ErrorResponse::from(err))
            }
        }
    }
}

fn apply_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(&'static str, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    builder
}

/// GET and DELETE only carry a payload when one was supplied.
fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.force_send_body().send(body),
        None => builder.call(),
    }
}

/// POST and PUT always publish a body, empty when none was supplied.
fn send_with_body(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body),
        None => builder.send_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    #[test]
    fn default_policy_verifies_certificates() {
        assert_eq!(Invoker::new().trust_policy(), TrustPolicy::Verify);
        assert_eq!(
            Invoker::with_trust_policy(TrustPolicy::AcceptInvalidCerts).trust_policy(),
            TrustPolicy::AcceptInvalidCerts
        );
    }

    #[test]
    fn invalid_url_becomes_error_response() {
        let result = Invoker::new().invoke(&InvocationRequest::get("not a url"));
        assert!(result.is_error());
        assert_eq!(result.status_code(), 500);
        assert!(result.body().starts_with(r#"{"error": ""#));
    }
}
