//! HTTP client construction for ERP API calls.
//!
//! Every call builds its own client with the configured timeout and drops it
//! when the call returns. Requests go through `reqwest-tracing` so each one
//! gets an `erp-api-request` span.

use std::time::Duration;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Result as MiddlewareResult};
use reqwest_tracing::{
    ReqwestOtelSpanBackend, TracingMiddleware, default_on_request_end, reqwest_otel_span,
};
use tracing::Span;

use crate::mcp::error::ErpError;

// Used through TracingMiddleware<ErpTracing>, which the compiler cannot see.
#[allow(dead_code)]
struct ErpTracing;

impl ReqwestOtelSpanBackend for ErpTracing {
    // Bodies and headers stay out of the span: they carry passwords and tokens.
    fn on_request_start(req: &Request, _extension: &mut Extensions) -> Span {
        reqwest_otel_span!(name = "erp-api-request", req)
    }

    fn on_request_end(
        span: &Span,
        outcome: &MiddlewareResult<Response>,
        _extension: &mut Extensions,
    ) {
        default_on_request_end(span, outcome);
    }
}

/// Builds a single-use client bounded by `timeout`.
///
/// # Errors
/// Returns `ErpError::Http` if the underlying TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<ClientWithMiddleware, ErpError> {
    let inner = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(ClientBuilder::new(inner)
        .with(TracingMiddleware::<ErpTracing>::new())
        .build())
}

/// Readable cause chain for a transport failure.
pub fn describe_transport_error(err: &reqwest_middleware::Error) -> String {
    match err {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
            format!("request timed out: {e}")
        }
        reqwest_middleware::Error::Reqwest(e) if e.is_connect() => {
            format!("connection failed: {e}")
        }
        other => other.to_string(),
    }
}
