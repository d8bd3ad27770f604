//! Order submission client.

use async_trait::async_trait;
use mockall::automock;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::orders::payload::OrderPayload;

/// Backend acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Human-readable confirmation.
    pub message: String,

    /// Backend-assigned order identifier.
    pub document_id: String,
}

/// Errors raised while submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The backend answered with a non-2xx status.
    #[error("Order failed: {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,

        /// Server-supplied message, or the status reason phrase.
        detail: String,
    },

    /// The request never completed.
    #[error("Order failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend accepted the order but the body could not be read.
    #[error("Order failed: unexpected response body")]
    InvalidResponse(#[source] serde_json::Error),
}

/// Submits validated payloads to the order-creation endpoint.
#[automock]
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// Place an order. Performs exactly one round trip and never retries.
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderConfirmation, OrderError>;
}

/// [`OrderClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    base_url: String,
    http: Client,
}

impl HttpOrderClient {
    /// A client for the backend at `base_url`, e.g. `"http://localhost:1337"`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// A client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Full URL of the create-order endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/api/create-order", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    data: &'a OrderPayload,
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderConfirmation, OrderError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&CreateOrderRequest { data: payload })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let reason = reason_phrase(&response);
            let body = response
                .bytes()
                .await
                .inspect_err(|error| warn!(%error, "failed to read error response body"))
                .unwrap_or_default();
            let detail = failure_detail(status, reason.as_deref(), &body);

            warn!(status = status.as_u16(), %detail, "order rejected");

            return Err(OrderError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await?;
        let confirmation: OrderConfirmation =
            serde_json::from_slice(&body).map_err(OrderError::InvalidResponse)?;

        info!(order = %confirmation.document_id, "order placed");

        Ok(confirmation)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,

    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// The reason phrase the server sent, when it differs from the canonical one.
fn reason_phrase(response: &Response) -> Option<String> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .map(str::to_string)
}

/// Pick the message to show for a failed request: `error.message`, then
/// `message`, then the server's reason phrase, then the canonical one.
pub fn failure_detail(status: StatusCode, reason: Option<&str>, body: &[u8]) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    parsed
        .error
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .or_else(|| parsed.message.filter(|message| !message.is_empty()))
        .or_else(|| reason.filter(|reason| !reason.is_empty()).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_message_wins() {
        let body = br#"{"error":{"message":"Invalid delivery method"},"message":"outer"}"#;

        assert_eq!(
            failure_detail(StatusCode::BAD_REQUEST, None, body),
            "Invalid delivery method"
        );
    }

    #[test]
    fn top_level_message_is_second_choice() {
        let body = br#"{"message":"Out of teak"}"#;

        assert_eq!(failure_detail(StatusCode::CONFLICT, None, body), "Out of teak");
    }

    #[test]
    fn empty_messages_fall_through() {
        let body = br#"{"error":{"message":""},"message":""}"#;

        assert_eq!(failure_detail(StatusCode::BAD_REQUEST, None, body), "Bad Request");
    }

    #[test]
    fn unparsable_body_uses_status_text() {
        assert_eq!(
            failure_detail(StatusCode::INTERNAL_SERVER_ERROR, None, b"<html>oops</html>"),
            "Internal Server Error"
        );
    }

    #[test]
    fn server_reason_phrase_beats_canonical_one() {
        assert_eq!(
            failure_detail(StatusCode::BAD_REQUEST, Some("Delivery Slot Taken"), b""),
            "Delivery Slot Taken"
        );
        assert_eq!(
            failure_detail(StatusCode::BAD_REQUEST, Some(""), b""),
            "Bad Request"
        );
    }

    #[test]
    fn body_message_beats_reason_phrase() {
        let body = br#"{"message":"Out of teak"}"#;

        assert_eq!(
            failure_detail(StatusCode::CONFLICT, Some("Stock Conflict"), body),
            "Out of teak"
        );
    }

    #[test]
    fn rejected_error_message() {
        let error = OrderError::Rejected {
            status: 400,
            detail: "Invalid delivery method".to_string(),
        };

        assert_eq!(error.to_string(), "Order failed: Invalid delivery method");
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = HttpOrderClient::new("http://localhost:1337/");

        assert_eq!(client.endpoint(), "http://localhost:1337/api/create-order");
    }
}
