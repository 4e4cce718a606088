// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Telegram Bot API.
//!
//! Every method performs a single POST with a bounded timeout and folds
//! the three failure shapes (transport error, non-2xx status, `ok:false`
//! body) into the uniform [`ApiOutcome`] envelope. Nothing here retries;
//! retry policy belongs to callers that want it.

use std::time::Duration;

use async_trait::async_trait;
use botline_core::types::ApiOutcome;
use botline_core::{BotlineError, ChannelApi};
use serde::Deserialize;
use tracing::{debug, warn};

/// Base URL for the hosted Telegram Bot API.
const API_BASE_URL: &str = "https://api.telegram.org";

/// Fixed per-request timeout for all provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bot API response envelope: `{ok, result}` or `{ok:false, description}`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// Stateless Telegram Bot API client.
///
/// Owns only a connection pool; safe to clone and share across tasks.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramClient {
    /// Creates a new client for the given bot token.
    pub fn new(token: impl Into<String>) -> Result<Self, BotlineError> {
        let token = token.into();
        if token.is_empty() {
            return Err(BotlineError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotlineError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            token,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (self-hosted Bot API gateways, wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Performs one Bot API method call and folds every failure shape
    /// into the envelope.
    async fn call(&self, method: &str, body: serde_json::Value) -> ApiOutcome {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(method, error = %e, "provider request failed");
                return ApiOutcome::failure(format!("request failed: {e}"));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                warn!(method, status = %status, error = %e, "failed to read provider response");
                return ApiOutcome::failure(format!("failed to read response body: {e}"));
            }
        };

        match serde_json::from_str::<ApiEnvelope>(&text) {
            Ok(envelope) if envelope.ok => {
                debug!(method, status = %status, "provider call succeeded");
                ApiOutcome::success(envelope.result.unwrap_or(serde_json::Value::Bool(true)))
            }
            Ok(envelope) => {
                let description = envelope
                    .description
                    .unwrap_or_else(|| format!("provider returned ok=false ({status})"));
                warn!(
                    method,
                    status = %status,
                    error_code = envelope.error_code,
                    description = description.as_str(),
                    "provider rejected call"
                );
                ApiOutcome::failure(description)
            }
            Err(e) => {
                warn!(method, status = %status, error = %e, "malformed provider response");
                ApiOutcome::failure(format!("malformed response ({status}): {e}"))
            }
        }
    }
}

#[async_trait]
impl ChannelApi for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> ApiOutcome {
        self.call(
            "sendMessage",
            serde_json::json!({"chat_id": chat_id, "text": text}),
        )
        .await
    }

    async fn send_photo(&self, chat_id: i64, photo: &str, caption: Option<&str>) -> ApiOutcome {
        let mut body = serde_json::json!({"chat_id": chat_id, "photo": photo});
        if let Some(caption) = caption {
            body["caption"] = serde_json::Value::String(caption.to_string());
        }
        self.call("sendPhoto", body).await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        document: &str,
        caption: Option<&str>,
    ) -> ApiOutcome {
        let mut body = serde_json::json!({"chat_id": chat_id, "document": document});
        if let Some(caption) = caption {
            body["caption"] = serde_json::Value::String(caption.to_string());
        }
        self.call("sendDocument", body).await
    }

    async fn get_identity(&self) -> ApiOutcome {
        self.call("getMe", serde_json::json!({})).await
    }

    async fn set_webhook(&self, url: &str, secret: Option<&str>) -> ApiOutcome {
        let mut body = serde_json::json!({"url": url});
        if let Some(secret) = secret {
            body["secret_token"] = serde_json::Value::String(secret.to_string());
        }
        self.call("setWebhook", body).await
    }

    async fn delete_webhook(&self) -> ApiOutcome {
        self.call("deleteWebhook", serde_json::json!({})).await
    }

    async fn get_webhook_info(&self) -> ApiOutcome {
        self.call("getWebhookInfo", serde_json::json!({})).await
    }
}
