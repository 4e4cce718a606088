// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for webhook ingestion.
//!
//! The webhook endpoint acknowledges with 200 for everything except a
//! secret-token mismatch. Providers retry non-2xx deliveries; a payload
//! that failed once will fail on every retry, so a poison message is
//! logged and dropped rather than turned into a retry storm.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use botline_telegram::types::Update;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::server::GatewayState;

/// Header carrying the webhook secret on Telegram deliveries.
const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// POST /webhook/{channel}
///
/// Verifies the secret token when one is configured, parses the payload
/// as a provider update, and hands it to the dispatch pipeline.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Path(channel): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if presented != expected {
            warn!(channel = %channel, "webhook secret token mismatch");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let Some(cfg) = state.channels.get(&channel) else {
        warn!(channel = %channel, "webhook delivery for unknown channel");
        return StatusCode::OK.into_response();
    };

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(channel = %channel, error = %e, "malformed webhook payload dropped");
            return StatusCode::OK.into_response();
        }
    };

    let update_id = update.update_id;
    match state.dispatcher.handle_update(cfg, &update).await {
        Ok(outcome) => {
            debug!(channel = %channel, update_id, ?outcome, "update dispatched");
        }
        Err(e) => {
            // The update is lost for this delivery, but a retry would hit
            // the same failure; acknowledge and leave a trace for operators.
            error!(channel = %channel, update_id, error = %e, "dispatch failed");
        }
    }

    StatusCode::OK.into_response()
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{GatewayState, router};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use botline_core::types::{ApiOutcome, AutoReplyRule, ChannelConfig, Contact, InboundMessage,
        OutgoingMessage, ReplyOverrides, UpsertOutcome};
    use botline_core::{BotlineError, ChannelApi, ConversationStore};
    use botline_dispatch::Dispatcher;
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    struct NullChannel;

    #[async_trait]
    impl ChannelApi for NullChannel {
        async fn send_text(&self, chat_id: i64, _text: &str) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!({"message_id": 1, "chat": {"id": chat_id}}))
        }
        async fn send_photo(&self, _c: i64, _p: &str, _cap: Option<&str>) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!({"message_id": 1}))
        }
        async fn send_document(&self, _c: i64, _d: &str, _cap: Option<&str>) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!({"message_id": 1}))
        }
        async fn get_identity(&self) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!({"id": 1}))
        }
        async fn set_webhook(&self, _u: &str, _s: Option<&str>) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!(true))
        }
        async fn delete_webhook(&self) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!(true))
        }
        async fn get_webhook_info(&self) -> ApiOutcome {
            ApiOutcome::success(serde_json::json!({"url": ""}))
        }
    }

    #[derive(Default)]
    struct MemStore {
        inbound: Mutex<Vec<InboundMessage>>,
    }

    #[async_trait]
    impl ConversationStore for MemStore {
        async fn upsert_inbound(
            &self,
            msg: &InboundMessage,
        ) -> Result<UpsertOutcome, BotlineError> {
            self.inbound.lock().unwrap().push(msg.clone());
            Ok(UpsertOutcome::Inserted)
        }
        async fn record_outgoing(&self, _msg: &OutgoingMessage) -> Result<(), BotlineError> {
            Ok(())
        }
        async fn upsert_contact(&self, _contact: &Contact) -> Result<(), BotlineError> {
            Ok(())
        }
        async fn active_rules(&self, _c: &str) -> Result<Vec<AutoReplyRule>, BotlineError> {
            Ok(Vec::new())
        }
        async fn touch_channel(&self, _c: &str, _at: DateTime<Utc>) -> Result<(), BotlineError> {
            Ok(())
        }
    }

    fn state_with_secret(store: Arc<MemStore>, secret: Option<&str>) -> GatewayState {
        let dispatcher = Dispatcher::new(Arc::new(NullChannel), store, None);
        let cfg = ChannelConfig {
            channel_id: "telegram-main".into(),
            rule_engine_enabled: true,
            ai_engine_enabled: false,
            assistant_profile: "assistant".into(),
            overrides: ReplyOverrides::default(),
        };
        GatewayState {
            dispatcher: Arc::new(dispatcher),
            channels: Arc::new(HashMap::from([("telegram-main".to_string(), cfg)])),
            webhook_secret: secret.map(str::to_string),
            start_time: std::time::Instant::now(),
        }
    }

    fn update_body() -> String {
        serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 100,
                "date": 1700000000,
                "chat": {"id": 555, "type": "private", "first_name": "Ana"},
                "text": "hello"
            }
        })
        .to_string()
    }

    fn webhook_request(secret: Option<&str>, body: String) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook/telegram-main")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header("x-telegram-bot-api-secret-token", secret);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn valid_update_is_dispatched_and_acknowledged() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store.clone(), None));

        let response = app.oneshot(webhook_request(None, update_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.inbound.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn secret_mismatch_is_rejected_with_401() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store.clone(), Some("expected")));

        let response = app
            .oneshot(webhook_request(Some("wrong"), update_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(store.inbound.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_secret_header_is_rejected_when_configured() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store, Some("expected")));

        let response = app.oneshot(webhook_request(None, update_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn correct_secret_is_accepted() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store.clone(), Some("expected")));

        let response = app
            .oneshot(webhook_request(Some("expected"), update_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.inbound.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_acknowledged_and_dropped() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store.clone(), None));

        let response = app
            .oneshot(webhook_request(None, "{not json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.inbound.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_channel_is_acknowledged_without_dispatch() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store.clone(), None));

        let request = Request::builder()
            .method("POST")
            .uri("/webhook/no-such-channel")
            .header("content-type", "application/json")
            .body(Body::from(update_body()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.inbound.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let store = Arc::new(MemStore::default());
        let app = router(state_with_secret(store, None));

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
