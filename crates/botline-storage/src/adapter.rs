// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ConversationStore`] implementation backed by the SQLite database.

use async_trait::async_trait;
use botline_core::types::{
    AutoReplyRule, Contact, InboundMessage, OutgoingMessage, UpsertOutcome,
};
use botline_core::{BotlineError, ConversationStore};
use chrono::{DateTime, Utc};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation store.
///
/// Thin delegation layer over the query modules; all concurrency safety
/// lives in the single-writer connection and the SQL upserts themselves.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the store at the given database path, running migrations.
    pub async fn open(path: &str) -> Result<Self, BotlineError> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Wraps an already-open database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the underlying database.
    pub async fn close(&self) -> Result<(), BotlineError> {
        self.db.close().await
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn upsert_inbound(&self, msg: &InboundMessage) -> Result<UpsertOutcome, BotlineError> {
        queries::messages::upsert_inbound(&self.db, msg).await
    }

    async fn record_outgoing(&self, msg: &OutgoingMessage) -> Result<(), BotlineError> {
        queries::messages::record_outgoing(&self.db, msg).await
    }

    async fn upsert_contact(&self, contact: &Contact) -> Result<(), BotlineError> {
        queries::contacts::upsert_contact(&self.db, contact).await
    }

    async fn active_rules(&self, channel_id: &str) -> Result<Vec<AutoReplyRule>, BotlineError> {
        queries::rules::active_rules(&self.db, channel_id).await
    }

    async fn touch_channel(
        &self,
        channel_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), BotlineError> {
        queries::channels::touch_channel(&self.db, channel_id, at).await
    }
}
