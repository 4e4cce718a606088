// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Botline workspace.
//!
//! Message kinds, provenance tags, and the persisted entity shapes are
//! defined once here and consumed by the storage, dispatch, and channel
//! crates. Kinds and modes carry string round-trips (strum) because they
//! are persisted as TEXT columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The kind of an inbound or outgoing message, decided once at ingestion.
///
/// Classification precedence over the raw webhook payload is fixed:
/// photo > document > video > audio > voice > sticker > text. A photo
/// with a caption is `Photo`, never `Text`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Photo,
    Document,
    Video,
    Audio,
    Voice,
    Sticker,
}

/// The kind of chat a message belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Direct,
    Group,
    Channel,
}

/// Records which actor produced an outgoing message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Human,
    RuleEngine,
    AiEngine,
}

/// How an auto-reply rule's trigger pattern is tested against message text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Contains,
    Regex,
}

/// The kind of response an auto-reply rule sends on match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Text,
    Photo,
    Document,
}

/// One received update, normalized from the provider webhook payload.
///
/// Invariant: `(channel_id, chat_id, provider_message_id)` is unique in
/// storage. Provider re-delivery must upsert (last-write-wins), never
/// duplicate a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub channel_id: String,
    pub provider_message_id: i64,
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub sender_id: Option<i64>,
    pub sender_username: Option<String>,
    pub sender_display_name: Option<String>,
    pub kind: MessageKind,
    /// Message body for text messages, caption otherwise. `None` when the
    /// payload carries neither.
    pub text: Option<String>,
    /// Opaque provider media descriptor (file ids, dimensions, mime type).
    pub media: Option<serde_json::Value>,
    pub received_at: DateTime<Utc>,
}

/// A message the system sent, recorded only after a successful send
/// acknowledgment from the channel adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub channel_id: String,
    /// Message id assigned by the provider in the send acknowledgment.
    pub provider_message_id: Option<i64>,
    pub chat_id: i64,
    pub kind: MessageKind,
    pub text: Option<String>,
    pub media: Option<serde_json::Value>,
    pub provenance: Provenance,
    /// Provider message id of the inbound message that triggered this
    /// reply. `None` for manual and broadcast sends.
    pub reply_to_provider_message_id: Option<i64>,
    pub sent_at: DateTime<Utc>,
}

/// One row per `(channel_id, chat_id)` in the contact directory.
///
/// Created on first inbound message from a chat, refreshed on every
/// subsequent one. The pipeline never deletes contacts, and a `None`
/// incoming display field never overwrites a stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub channel_id: String,
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub last_message_at: DateTime<Utc>,
}

/// An auto-reply rule belonging to a channel.
///
/// Evaluation order is active rules sorted by priority descending, ties
/// broken by creation order, then id (stable, deterministic replay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoReplyRule {
    pub id: i64,
    pub channel_id: String,
    pub trigger: String,
    pub match_mode: MatchMode,
    pub priority: i64,
    pub active: bool,
    pub response_kind: ResponseKind,
    pub response_body: String,
    /// Media URL or provider file id for photo/document responses.
    pub response_media: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-message overrides for the AI responder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyOverrides {
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Immutable per-invocation channel configuration.
///
/// Passed into the dispatch pipeline with each update so concurrent
/// updates never observe a toggle flipping mid-pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub channel_id: String,
    pub rule_engine_enabled: bool,
    pub ai_engine_enabled: bool,
    pub assistant_profile: String,
    #[serde(default)]
    pub overrides: ReplyOverrides,
}

/// Uniform success/error envelope returned by every channel API call.
///
/// Transport failures, non-2xx statuses, and provider-level rejections
/// all surface here; `ChannelApi` methods never return `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// Provider accepted the call; `result` is the raw provider payload.
    Success { result: serde_json::Value },
    /// The call failed; `error` preserves the provider description or
    /// transport error for operator logs.
    Failure { error: String },
}

impl ApiOutcome {
    /// Wraps a provider result payload.
    pub fn success(result: serde_json::Value) -> Self {
        Self::Success { result }
    }

    /// Wraps an error description.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the error description for failures.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Extracts the provider-assigned `message_id` from a send result.
    pub fn message_id(&self) -> Option<i64> {
        match self {
            Self::Success { result } => result.get("message_id").and_then(|v| v.as_i64()),
            Self::Failure { .. } => None,
        }
    }
}

/// Result of an idempotent inbound upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First delivery of this provider message id; the row was created.
    Inserted,
    /// Re-delivery; the existing row was refreshed (last-write-wins) and
    /// the caller must not trigger another auto-reply.
    Duplicate,
}
