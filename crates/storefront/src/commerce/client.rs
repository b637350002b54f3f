//! The HTTP client wrapper every gateway goes through.
//!
//! Responsibilities, and nothing more:
//! - one `reqwest::Client` with the fixed request timeout from configuration
//! - bearer-token attachment when the shopper's session holds one
//! - uniform error surfacing (non-2xx, 401, envelope rejection, parse)
//!
//! No retries, no caching, no request coalescing.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CommerceApiConfig;

use super::types::Envelope;
use super::{CommerceError, GENERIC_FAILURE};

/// A successful gateway result: the unwrapped payload plus the
/// server-supplied message (the shopper-notification text).
#[derive(Debug, Clone)]
pub struct ApiOk<T> {
    /// The unwrapped `data` payload.
    pub data: T,
    /// The server's `message`, when it sent one.
    pub message: Option<String>,
}

impl<T> ApiOk<T> {
    /// The notification text, falling back to `default` when the server
    /// sent no message.
    #[must_use]
    pub fn notification(&self, default: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| default.to_string())
    }
}

/// Client for the Saffron commerce API.
///
/// Cheap to clone; gateways live in per-resource `impl` blocks in the
/// sibling modules.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &CommerceApiConfig) -> Result<Self, CommerceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute one round trip and unwrap the envelope's payload.
    ///
    /// Never retries; a 401 becomes [`CommerceError::Unauthorized`] and is
    /// left for the caller to act on.
    pub(super) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiOk<T>, CommerceError> {
        let envelope = self.send_envelope(method, path, auth, body).await?;

        let data = envelope
            .data
            .ok_or_else(|| CommerceError::MissingData(path.to_string()))?;

        Ok(ApiOk {
            data,
            message: envelope.message,
        })
    }

    /// Like [`Self::send`] for operations whose payload does not matter;
    /// keeps the server message for the notification.
    pub(super) async fn send_expect_message(
        &self,
        method: Method,
        path: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiOk<()>, CommerceError> {
        let envelope = self
            .send_envelope::<serde_json::Value>(method, path, auth, body)
            .await?;

        Ok(ApiOk {
            data: (),
            message: envelope.message,
        })
    }

    /// One round trip: status triage, body parse, envelope rejection check.
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope<T>, CommerceError> {
        let mut request = self.inner.client.request(method, self.url(path));

        if let Some(token) = auth {
            request = request.bearer_auth(token);
        }
        if let Some(json) = body {
            request = request.json(&json);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CommerceError::Unauthorized);
        }

        // Body as text first for better diagnostics on malformed responses
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = extract_message(&response_text)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::warn!(
                status = %status,
                path = %path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Commerce API returned non-success status"
            );
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                return Err(CommerceError::Parse(e));
            }
        };

        if !envelope.success {
            return Err(CommerceError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ));
        }

        debug!(path = %path, "Commerce API call succeeded");

        Ok(envelope)
    }
}

/// Pull the `message` field out of an error body, if it is JSON at all.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_json_body() {
        assert_eq!(
            extract_message(r#"{"success": false, "message": "No such item"}"#),
            Some("No such item".to_string())
        );
    }

    #[test]
    fn test_extract_message_from_non_json_body() {
        assert_eq!(extract_message("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_message(r#"{"success": false}"#), None);
    }

    #[test]
    fn test_api_ok_notification_fallback() {
        let ok = ApiOk {
            data: (),
            message: None,
        };
        assert_eq!(ok.notification("Added to cart"), "Added to cart");

        let ok = ApiOk {
            data: (),
            message: Some("Saved for later".to_string()),
        };
        assert_eq!(ok.notification("Added to cart"), "Saved for later");
    }
}
