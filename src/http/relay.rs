//! Upstream relay: forward one GET and copy the response back verbatim.
//!
//! # Responsibilities
//! - Issue a single outbound GET to the rewritten upstream URL
//! - Capture status, ordered headers, and the full body
//! - Log one line per proxied request
//!
//! # Design Decisions
//! - No retries: a proxied request is attempted exactly once
//! - Headers are copied unchanged, in order, nothing added or removed;
//!   whatever the upstream sent is what the client sees
//! - The body is buffered in memory in full before any byte is written
//!   back (acceptable for a development tool, not a streaming proxy)
//! - Timeout errors map to 504, everything else to 502; the caller picks
//!   the client-facing status via [`RelayError::client_status`]

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Error type for a failed relay attempt. Scoped to one request; the
/// server keeps serving other connections.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),
}

impl RelayError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Upstream(e)
        }
    }

    /// Status code reported to the original client for this failure.
    pub fn client_status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// One upstream response, captured in full.
///
/// Headers keep the upstream's order and duplicates. Exists only for the
/// duration of one request-response cycle.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        for (name, value) in self.headers {
            response.headers_mut().append(name, value);
        }
        response
    }
}

/// Forward a GET to `url` and capture the upstream's response.
///
/// Logs the literal request line sent upstream together with the upstream
/// status and its `Content-Length` header (`-` when absent).
pub async fn relay(client: &reqwest::Client, url: &str) -> Result<UpstreamResponse, RelayError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(RelayError::from_reqwest)?;

    let status = response.status();
    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info!(
        request = %format!("GET {} {:?}", url, response.version()),
        status = status.as_u16(),
        content_length = %content_length,
        "PROXY"
    );

    let headers: Vec<(HeaderName, HeaderValue)> = response
        .headers()
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let body = response.bytes().await.map_err(RelayError::from_reqwest)?;

    Ok(UpstreamResponse {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_preserves_status_and_body() {
        let upstream = UpstreamResponse {
            status: StatusCode::CREATED,
            headers: vec![],
            body: Bytes::from_static(b"a,b\n1,2\n"),
        };
        let response = upstream.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_into_response_preserves_header_order_and_duplicates() {
        let upstream = UpstreamResponse {
            status: StatusCode::OK,
            headers: vec![
                (
                    HeaderName::from_static("x-first"),
                    HeaderValue::from_static("1"),
                ),
                (
                    HeaderName::from_static("set-cookie"),
                    HeaderValue::from_static("a=1"),
                ),
                (
                    HeaderName::from_static("set-cookie"),
                    HeaderValue::from_static("b=2"),
                ),
            ],
            body: Bytes::new(),
        };
        let response = upstream.into_response();
        let cookies: Vec<_> = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "a=1");
        assert_eq!(cookies[1], "b=2");
        assert_eq!(response.headers().get("x-first").unwrap(), "1");
    }
}
