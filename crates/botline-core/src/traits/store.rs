// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence store trait for the message log, contact directory, and
//! auto-reply rule definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BotlineError;
use crate::types::{AutoReplyRule, Contact, InboundMessage, OutgoingMessage, UpsertOutcome};

/// Persistence surface consumed by the dispatch pipeline.
///
/// All write operations carry idempotent-upsert semantics at the storage
/// layer (atomic `ON CONFLICT` updates, never read-then-write), so the
/// pipeline is safe under concurrent duplicate webhook deliveries.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Idempotently persists an inbound message, keyed by
    /// `(channel_id, chat_id, provider_message_id)`.
    ///
    /// Re-delivery refreshes the existing row (last-write-wins) and
    /// reports [`UpsertOutcome::Duplicate`].
    async fn upsert_inbound(&self, msg: &InboundMessage) -> Result<UpsertOutcome, BotlineError>;

    /// Records a successfully sent outgoing message with its provenance.
    async fn record_outgoing(&self, msg: &OutgoingMessage) -> Result<(), BotlineError>;

    /// Creates or refreshes the contact row for `(channel_id, chat_id)`.
    ///
    /// A `None` incoming display field must never overwrite a stored
    /// non-null value.
    async fn upsert_contact(&self, contact: &Contact) -> Result<(), BotlineError>;

    /// Returns the channel's active rules in evaluation order
    /// (priority descending, creation order ascending).
    async fn active_rules(&self, channel_id: &str) -> Result<Vec<AutoReplyRule>, BotlineError>;

    /// Records channel liveness (last webhook delivery timestamp).
    async fn touch_channel(&self, channel_id: &str, at: DateTime<Utc>)
    -> Result<(), BotlineError>;
}
