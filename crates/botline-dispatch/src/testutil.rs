// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory fakes for pipeline and broadcast tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use botline_core::types::{ApiOutcome, AutoReplyRule, Contact, InboundMessage, OutgoingMessage,
    ReplyOverrides, UpsertOutcome};
use botline_core::{BotlineError, ChannelApi, ConversationStore};
use botline_telegram::types::Update;
use chrono::{DateTime, Utc};

use crate::pipeline::ReplyGenerator;

/// Channel fake that records every send and can fail selected chats.
pub struct FakeChannel {
    texts: Mutex<Vec<(i64, String)>>,
    photos: Mutex<Vec<(i64, String, Option<String>)>>,
    documents: Mutex<Vec<(i64, String, Option<String>)>>,
    attempts: Mutex<Vec<i64>>,
    failing: Mutex<HashSet<i64>>,
    next_message_id: AtomicI64,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self {
            texts: Mutex::new(Vec::new()),
            photos: Mutex::new(Vec::new()),
            documents: Mutex::new(Vec::new()),
            attempts: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            next_message_id: AtomicI64::new(9000),
        }
    }

    /// All sends to this chat will fail from now on.
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn sent_texts(&self) -> Vec<(i64, String)> {
        self.texts.lock().unwrap().clone()
    }

    pub fn sent_photos(&self) -> Vec<(i64, String, Option<String>)> {
        self.photos.lock().unwrap().clone()
    }

    pub fn attempted_chats(&self) -> Vec<i64> {
        self.attempts.lock().unwrap().clone()
    }

    fn outcome_for(&self, chat_id: i64) -> ApiOutcome {
        self.attempts.lock().unwrap().push(chat_id);
        if self.failing.lock().unwrap().contains(&chat_id) {
            ApiOutcome::failure("Forbidden: bot was blocked by the user")
        } else {
            let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
            ApiOutcome::success(serde_json::json!({"message_id": id, "chat": {"id": chat_id}}))
        }
    }
}

#[async_trait]
impl ChannelApi for FakeChannel {
    async fn send_text(&self, chat_id: i64, text: &str) -> ApiOutcome {
        let outcome = self.outcome_for(chat_id);
        if outcome.is_success() {
            self.texts.lock().unwrap().push((chat_id, text.to_string()));
        }
        outcome
    }

    async fn send_photo(&self, chat_id: i64, photo: &str, caption: Option<&str>) -> ApiOutcome {
        let outcome = self.outcome_for(chat_id);
        if outcome.is_success() {
            self.photos.lock().unwrap().push((
                chat_id,
                photo.to_string(),
                caption.map(str::to_string),
            ));
        }
        outcome
    }

    async fn send_document(
        &self,
        chat_id: i64,
        document: &str,
        caption: Option<&str>,
    ) -> ApiOutcome {
        let outcome = self.outcome_for(chat_id);
        if outcome.is_success() {
            self.documents.lock().unwrap().push((
                chat_id,
                document.to_string(),
                caption.map(str::to_string),
            ));
        }
        outcome
    }

    async fn get_identity(&self) -> ApiOutcome {
        ApiOutcome::success(serde_json::json!({"id": 1, "is_bot": true, "username": "fake_bot"}))
    }

    async fn set_webhook(&self, _url: &str, _secret: Option<&str>) -> ApiOutcome {
        ApiOutcome::success(serde_json::json!(true))
    }

    async fn delete_webhook(&self) -> ApiOutcome {
        ApiOutcome::success(serde_json::json!(true))
    }

    async fn get_webhook_info(&self) -> ApiOutcome {
        ApiOutcome::success(serde_json::json!({"url": ""}))
    }
}

/// Store fake mirroring the real store's idempotency semantics.
pub struct FakeStore {
    inbound: Mutex<Vec<InboundMessage>>,
    outgoing: Mutex<Vec<OutgoingMessage>>,
    contacts: Mutex<Vec<Contact>>,
    rules: Mutex<Vec<AutoReplyRule>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(Vec::new()),
            outgoing: Mutex::new(Vec::new()),
            contacts: Mutex::new(Vec::new()),
            rules: Mutex::new(Vec::new()),
        }
    }

    pub fn add_rule(&self, rule: AutoReplyRule) {
        self.rules.lock().unwrap().push(rule);
    }

    pub fn inbound(&self) -> Vec<InboundMessage> {
        self.inbound.lock().unwrap().clone()
    }

    pub fn outgoing(&self) -> Vec<OutgoingMessage> {
        self.outgoing.lock().unwrap().clone()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for FakeStore {
    async fn upsert_inbound(&self, msg: &InboundMessage) -> Result<UpsertOutcome, BotlineError> {
        let mut inbound = self.inbound.lock().unwrap();
        if let Some(existing) = inbound.iter_mut().find(|m| {
            m.channel_id == msg.channel_id
                && m.chat_id == msg.chat_id
                && m.provider_message_id == msg.provider_message_id
        }) {
            *existing = msg.clone();
            Ok(UpsertOutcome::Duplicate)
        } else {
            inbound.push(msg.clone());
            Ok(UpsertOutcome::Inserted)
        }
    }

    async fn record_outgoing(&self, msg: &OutgoingMessage) -> Result<(), BotlineError> {
        self.outgoing.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn upsert_contact(&self, contact: &Contact) -> Result<(), BotlineError> {
        let mut contacts = self.contacts.lock().unwrap();
        if let Some(existing) = contacts
            .iter_mut()
            .find(|c| c.channel_id == contact.channel_id && c.chat_id == contact.chat_id)
        {
            *existing = contact.clone();
        } else {
            contacts.push(contact.clone());
        }
        Ok(())
    }

    async fn active_rules(&self, channel_id: &str) -> Result<Vec<AutoReplyRule>, BotlineError> {
        let mut rules: Vec<AutoReplyRule> = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.channel_id == channel_id && r.active)
            .cloned()
            .collect();
        botline_rules::order_rules(&mut rules);
        Ok(rules)
    }

    async fn touch_channel(
        &self,
        _channel_id: &str,
        _at: DateTime<Utc>,
    ) -> Result<(), BotlineError> {
        Ok(())
    }
}

/// Responder fake returning a canned reply and counting invocations.
pub struct FakeResponder {
    reply: String,
    calls: AtomicUsize,
}

impl FakeResponder {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyGenerator for FakeResponder {
    async fn reply(
        &self,
        _session_key: &str,
        _text: &str,
        _profile: &str,
        _overrides: &ReplyOverrides,
    ) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// Builds a plain text-message update for tests.
pub fn update_with_text(message_id: i64, chat_id: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": message_id,
        "message": {
            "message_id": message_id,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private", "first_name": "Ana"},
            "from": {"id": 777, "username": "ana", "first_name": "Ana"},
            "text": text
        }
    }))
    .unwrap()
}
