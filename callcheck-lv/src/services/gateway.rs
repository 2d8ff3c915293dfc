//! External service gateway
//!
//! Single-attempt outbound HTTP with uniform failure translation: transport
//! errors, timeouts, and unparseable bodies become [`GatewayError::Unavailable`];
//! non-200 statuses become [`GatewayError::Rejected`] carrying the upstream's
//! own `message`/`error` text when it provides one. Retry is left to nobody:
//! the pipeline stages impose pass/fail semantics, not transient-fault
//! recovery.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("callcheck/", env!("CARGO_PKG_VERSION"));

/// Fallback text when a rejecting upstream provides no message of its own
const GENERIC_UPSTREAM_ERROR: &str = "Internal server error";

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, timeout, or unparseable response body
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Upstream answered with a non-200 status
    #[error("Upstream rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// HTTP method for a gateway request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Body of a gateway request
#[derive(Debug, Clone)]
pub enum GatewayBody {
    Empty,
    Json(Value),
    /// Form-encoded body built from a flat JSON object
    Form(Value),
}

/// One outbound call: method, URL, optional Basic authorization, body
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub url: String,
    /// Token for a `Basic <token>` authorization header
    pub token: Option<String>,
    pub body: GatewayBody,
}

impl GatewayRequest {
    pub fn get(url: String, token: &str) -> Self {
        Self {
            method: Method::Get,
            url,
            token: Some(token.to_string()),
            body: GatewayBody::Empty,
        }
    }

    pub fn post_json(url: String, token: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            url,
            token: Some(token.to_string()),
            body: GatewayBody::Json(body),
        }
    }

    pub fn post_form(url: String, token: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            url,
            token: Some(token.to_string()),
            body: GatewayBody::Form(body),
        }
    }
}

/// Seam for outbound HTTP, so pipeline runs can be tested without a network
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Issue one outbound call and return the parsed 200 response body
    async fn invoke(&self, request: GatewayRequest) -> Result<Value, GatewayError>;
}

/// Production gateway over a shared `reqwest::Client`
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway with the given per-request timeout
    ///
    /// The timeout bounds the whole request (connect through body read); the
    /// original service relied on the transport default, which is unbounded.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn invoke(&self, request: GatewayRequest) -> Result<Value, GatewayError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if let Some(token) = &request.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Basic {}", token));
        }

        builder = match &request.body {
            GatewayBody::Empty => builder,
            GatewayBody::Json(value) => builder.json(value),
            GatewayBody::Form(value) => builder.form(value),
        };

        tracing::debug!(method = ?request.method, url = %request.url, "Invoking external service");

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            // Surface the upstream's own message/error field when present
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .or_else(|| body.get("error"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string());

            tracing::warn!(
                url = %request.url,
                status = status.as_u16(),
                message = %message,
                "External service rejected request"
            );

            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = HttpGateway::new(Duration::from_secs(10));
        assert!(gateway.is_ok());
    }

    #[test]
    fn test_request_constructors() {
        let request = GatewayRequest::get("https://example.com/history".to_string(), "tok");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.token.as_deref(), Some("tok"));
        assert!(matches!(request.body, GatewayBody::Empty));

        let request = GatewayRequest::post_form(
            "https://example.com/leads".to_string(),
            "tok",
            serde_json::json!({"a": "1"}),
        );
        assert_eq!(request.method, Method::Post);
        assert!(matches!(request.body, GatewayBody::Form(_)));
    }
}
