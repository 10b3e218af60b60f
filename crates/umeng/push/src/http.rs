//! HTTP transport using reqwest.

use std::time::Duration;

use umeng_core::{ApiResponse, TransportError};
use umeng_crypto::{Method, SignedRequest};

use crate::Transport;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport posting signed requests over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                message: format!("failed to build http client: {e}"),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<ApiResponse, TransportError> {
        let url = request.url();
        let request_failed = |e: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut builder = match request.method() {
            Method::Post => self.client.post(url),
            Method::Get => self.client.get(url),
        }
        .query(&request.query());

        if !request.body().is_empty() {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(request.body().to_string());
        }

        let response = builder.send().await.map_err(request_failed)?;
        let status = response.status();
        let text = response.text().await.map_err(request_failed)?;

        tracing::debug!(url = %url, status = status.as_u16(), "API replied");

        decode_reply(status, text)
    }
}

/// Map an HTTP status and body to an API reply.
///
/// Rejections come back as 4xx with a regular reply body, so the body is
/// decoded first whatever the status.
fn decode_reply(status: reqwest::StatusCode, text: String) -> Result<ApiResponse, TransportError> {
    match serde_json::from_str::<ApiResponse>(&text) {
        Ok(reply) => Ok(reply),
        Err(e) if status.is_success() => Err(TransportError::Decode(e.to_string())),
        Err(_) => Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        }),
    }
}
