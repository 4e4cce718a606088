// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation history for AI-generated replies.
//!
//! Each session keeps a bounded window of recent turns with a sliding
//! TTL. History is a generation aid, not a record; the durable message
//! log lives in storage. Losing this cache on restart only costs
//! conversational context.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire-format role string for the Messages API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Derives the session key an inbound message's history lives under.
///
/// Group chats share one session per sender so the assistant does not
/// mix up who it was talking to.
pub fn session_key(channel_id: &str, chat_id: i64, sender_id: Option<i64>) -> String {
    format!("{channel_id}:{chat_id}:{}", sender_id.unwrap_or(chat_id))
}

struct CachedHistory {
    turns: Vec<Turn>,
    expires_at: Instant,
}

/// Bounded per-session history cache with a sliding TTL.
///
/// Holds at most `2 * max_exchanges` turns per session (one exchange is
/// a user turn plus an assistant turn); the oldest turns are evicted
/// first. Storing refreshes the TTL; an expired session reads as empty.
pub struct HistoryCache {
    entries: DashMap<String, CachedHistory>,
    max_exchanges: usize,
    ttl: Duration,
}

impl HistoryCache {
    pub fn new(max_exchanges: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_exchanges,
            ttl,
        }
    }

    /// Returns the session's turns, oldest first. Expired or unknown
    /// sessions yield an empty history.
    pub fn load(&self, key: &str) -> Vec<Turn> {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => entry.turns.clone(),
            Some(_) => {
                drop(self.entries.remove(key));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Replaces the session's history, trimming to the turn bound and
    /// refreshing the TTL.
    pub fn store(&self, key: &str, mut turns: Vec<Turn>) {
        self.trim(&mut turns);
        self.entries.insert(
            key.to_string(),
            CachedHistory {
                turns,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drops the session's history entirely.
    pub fn clear(&self, key: &str) {
        self.entries.remove(key);
    }

    fn trim(&self, turns: &mut Vec<Turn>) {
        let bound = self.max_exchanges * 2;
        if turns.len() > bound {
            turns.drain(..turns.len() - bound);
        }
        // Keep exchanges aligned: never lead with a dangling assistant turn.
        if turns.first().is_some_and(|t| t.role == Role::Assistant) {
            turns.remove(0);
        }
    }
}
