// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inbound dispatch pipeline.
//!
//! One [`Dispatcher::handle_update`] call per webhook delivery. Delivery
//! is at-least-once, so ingestion is an idempotent upsert and a
//! re-delivered update stops before any reply. Channel engine toggles
//! arrive as an immutable [`ChannelConfig`] snapshot per invocation;
//! nothing is re-fetched mid-pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use botline_core::types::{ChannelConfig, Contact, MessageKind, OutgoingMessage, Provenance,
    ReplyOverrides, ResponseKind, UpsertOutcome};
use botline_core::{BotlineError, ChannelApi, ConversationStore};
use botline_telegram::ingest::to_inbound;
use botline_telegram::types::Update;
use chrono::Utc;
use metrics::counter;
use tracing::{debug, warn};

/// Seam between the pipeline and the AI engine so the pipeline can be
/// tested without a live provider.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generates a reply; must always return a sendable string.
    async fn reply(
        &self,
        session_key: &str,
        text: &str,
        profile: &str,
        overrides: &ReplyOverrides,
    ) -> String;
}

#[async_trait]
impl ReplyGenerator for botline_ai::AiResponder {
    async fn reply(
        &self,
        session_key: &str,
        text: &str,
        profile: &str,
        overrides: &ReplyOverrides,
    ) -> String {
        botline_ai::AiResponder::reply(self, session_key, text, profile, overrides).await
    }
}

/// How the pipeline disposed of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The update carried no message payload.
    Ignored,
    /// Re-delivery of an already-ingested message; no reply attempted.
    Duplicate,
    /// A reply was sent and recorded, by the named engine.
    Replied(Provenance),
    /// Ingested and stored, but no engine produced a reply (or the send
    /// itself failed).
    Silent,
}

/// Routes one webhook update through ingestion and reply resolution.
pub struct Dispatcher {
    channel: Arc<dyn ChannelApi>,
    store: Arc<dyn ConversationStore>,
    responder: Option<Arc<dyn ReplyGenerator>>,
}

impl Dispatcher {
    pub fn new(
        channel: Arc<dyn ChannelApi>,
        store: Arc<dyn ConversationStore>,
        responder: Option<Arc<dyn ReplyGenerator>>,
    ) -> Self {
        Self {
            channel,
            store,
            responder,
        }
    }

    /// Handles one webhook update end to end.
    ///
    /// Returns `Err` only for persistence failures, which abort this
    /// update; the caller logs them and still acknowledges the webhook.
    /// Send failures never surface as errors.
    pub async fn handle_update(
        &self,
        cfg: &ChannelConfig,
        update: &Update,
    ) -> Result<DispatchOutcome, BotlineError> {
        let Some(msg) = update.message() else {
            debug!(update_id = update.update_id, "update carries no message, ignoring");
            return Ok(DispatchOutcome::Ignored);
        };

        counter!("botline_updates_received_total").increment(1);

        // Liveness is best-effort; a failed touch never blocks ingestion.
        if let Err(e) = self.store.touch_channel(&cfg.channel_id, Utc::now()).await {
            warn!(channel_id = %cfg.channel_id, error = %e, "channel liveness touch failed");
        }

        let inbound = to_inbound(&cfg.channel_id, msg);

        if self.store.upsert_inbound(&inbound).await? == UpsertOutcome::Duplicate {
            counter!("botline_updates_duplicate_total").increment(1);
            debug!(
                channel_id = %cfg.channel_id,
                provider_message_id = inbound.provider_message_id,
                "duplicate delivery, suppressing reply"
            );
            return Ok(DispatchOutcome::Duplicate);
        }

        let contact = Contact {
            channel_id: cfg.channel_id.clone(),
            chat_id: inbound.chat_id,
            chat_kind: inbound.chat_kind,
            first_name: msg.chat.first_name.clone().or_else(|| msg.chat.title.clone()),
            last_name: msg.chat.last_name.clone(),
            username: inbound.sender_username.clone(),
            last_message_at: inbound.received_at,
        };
        self.store.upsert_contact(&contact).await?;

        if !cfg.rule_engine_enabled && !cfg.ai_engine_enabled {
            return Ok(DispatchOutcome::Silent);
        }

        let text = inbound.text.as_deref().unwrap_or("");

        if cfg.rule_engine_enabled {
            let rules = self.store.active_rules(&cfg.channel_id).await?;
            if let Some(rule) = botline_rules::first_match(&rules, text) {
                debug!(rule_id = rule.id, trigger = %rule.trigger, "rule matched");
                return self.send_rule_response(cfg, &inbound, rule).await;
            }
        }

        if cfg.ai_engine_enabled
            && !text.trim().is_empty()
            && let Some(responder) = self.responder.as_ref()
        {
            let key =
                botline_ai::session_key(&cfg.channel_id, inbound.chat_id, inbound.sender_id);
            let reply = responder
                .reply(&key, text, &cfg.assistant_profile, &cfg.overrides)
                .await;

            let outcome = self.channel.send_text(inbound.chat_id, &reply).await;
            if !outcome.is_success() {
                counter!("botline_send_failures_total").increment(1);
                warn!(
                    chat_id = inbound.chat_id,
                    error = outcome.error().unwrap_or("unknown"),
                    "AI reply send failed"
                );
                return Ok(DispatchOutcome::Silent);
            }

            counter!("botline_replies_total", "engine" => "ai").increment(1);
            self.store
                .record_outgoing(&OutgoingMessage {
                    channel_id: cfg.channel_id.clone(),
                    provider_message_id: outcome.message_id(),
                    chat_id: inbound.chat_id,
                    kind: MessageKind::Text,
                    text: Some(reply),
                    media: None,
                    provenance: Provenance::AiEngine,
                    reply_to_provider_message_id: Some(inbound.provider_message_id),
                    sent_at: Utc::now(),
                })
                .await?;
            return Ok(DispatchOutcome::Replied(Provenance::AiEngine));
        }

        Ok(DispatchOutcome::Silent)
    }

    async fn send_rule_response(
        &self,
        cfg: &ChannelConfig,
        inbound: &botline_core::types::InboundMessage,
        rule: &botline_core::types::AutoReplyRule,
    ) -> Result<DispatchOutcome, BotlineError> {
        let media = rule.response_media.as_deref().unwrap_or_default();
        let (outcome, kind) = match rule.response_kind {
            ResponseKind::Text => (
                self.channel.send_text(inbound.chat_id, &rule.response_body).await,
                MessageKind::Text,
            ),
            ResponseKind::Photo => (
                self.channel
                    .send_photo(inbound.chat_id, media, Some(&rule.response_body))
                    .await,
                MessageKind::Photo,
            ),
            ResponseKind::Document => (
                self.channel
                    .send_document(inbound.chat_id, media, Some(&rule.response_body))
                    .await,
                MessageKind::Document,
            ),
        };

        if !outcome.is_success() {
            counter!("botline_send_failures_total").increment(1);
            warn!(
                chat_id = inbound.chat_id,
                rule_id = rule.id,
                error = outcome.error().unwrap_or("unknown"),
                "rule response send failed"
            );
            return Ok(DispatchOutcome::Silent);
        }

        counter!("botline_replies_total", "engine" => "rule").increment(1);
        self.store
            .record_outgoing(&OutgoingMessage {
                channel_id: cfg.channel_id.clone(),
                provider_message_id: outcome.message_id(),
                chat_id: inbound.chat_id,
                kind,
                text: Some(rule.response_body.clone()),
                media: rule
                    .response_media
                    .as_ref()
                    .map(|m| serde_json::Value::String(m.clone())),
                provenance: Provenance::RuleEngine,
                reply_to_provider_message_id: Some(inbound.provider_message_id),
                sent_at: Utc::now(),
            })
            .await?;
        Ok(DispatchOutcome::Replied(Provenance::RuleEngine))
    }
}
