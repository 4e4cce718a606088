// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound and outgoing message log operations.
//!
//! Inbound persistence is the idempotency anchor of the whole pipeline:
//! the upsert is keyed by `(channel_id, chat_id, provider_message_id)`
//! and reports whether the row already existed, so duplicate webhook
//! deliveries refresh the row without triggering a second auto-reply.

use botline_core::BotlineError;
use botline_core::types::{InboundMessage, OutgoingMessage, UpsertOutcome};
use rusqlite::params;

use crate::database::{Database, map_tr_err, parse_enum, parse_json, parse_timestamp};

/// Idempotently persists an inbound message.
///
/// The existence probe and the conflict-safe upsert run inside one
/// closure on the single writer connection, so concurrent duplicate
/// deliveries serialize and the reported outcome is exact.
pub async fn upsert_inbound(
    db: &Database,
    msg: &InboundMessage,
) -> Result<UpsertOutcome, BotlineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let existed: bool = conn
                .query_row(
                    "SELECT 1 FROM inbound_messages
                     WHERE channel_id = ?1 AND chat_id = ?2 AND provider_message_id = ?3",
                    params![msg.channel_id, msg.chat_id, msg.provider_message_id],
                    |_| Ok(true),
                )
                .map(|_| true)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(false),
                    other => Err(other),
                })?;

            conn.execute(
                "INSERT INTO inbound_messages
                     (channel_id, chat_id, provider_message_id, chat_kind, sender_id,
                      sender_username, sender_display_name, kind, text, media, received_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT (channel_id, chat_id, provider_message_id) DO UPDATE SET
                     chat_kind = excluded.chat_kind,
                     sender_id = excluded.sender_id,
                     sender_username = excluded.sender_username,
                     sender_display_name = excluded.sender_display_name,
                     kind = excluded.kind,
                     text = excluded.text,
                     media = excluded.media,
                     received_at = excluded.received_at",
                params![
                    msg.channel_id,
                    msg.chat_id,
                    msg.provider_message_id,
                    msg.chat_kind.to_string(),
                    msg.sender_id,
                    msg.sender_username,
                    msg.sender_display_name,
                    msg.kind.to_string(),
                    msg.text,
                    msg.media.as_ref().map(|m| m.to_string()),
                    msg.received_at.to_rfc3339(),
                ],
            )?;

            Ok(if existed {
                UpsertOutcome::Duplicate
            } else {
                UpsertOutcome::Inserted
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Records a successfully sent outgoing message.
pub async fn record_outgoing(db: &Database, msg: &OutgoingMessage) -> Result<(), BotlineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO outgoing_messages
                     (channel_id, provider_message_id, chat_id, kind, text, media,
                      provenance, reply_to_provider_message_id, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.channel_id,
                    msg.provider_message_id,
                    msg.chat_id,
                    msg.kind.to_string(),
                    msg.text,
                    msg.media.as_ref().map(|m| m.to_string()),
                    msg.provenance.to_string(),
                    msg.reply_to_provider_message_id,
                    msg.sent_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Returns a chat's inbound messages in arrival order.
pub async fn inbound_for_chat(
    db: &Database,
    channel_id: &str,
    chat_id: i64,
) -> Result<Vec<InboundMessage>, BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, chat_id, provider_message_id, chat_kind, sender_id,
                        sender_username, sender_display_name, kind, text, media, received_at
                 FROM inbound_messages
                 WHERE channel_id = ?1 AND chat_id = ?2
                 ORDER BY received_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![channel_id, chat_id], |row| {
                Ok(InboundMessage {
                    channel_id: row.get(0)?,
                    chat_id: row.get(1)?,
                    provider_message_id: row.get(2)?,
                    chat_kind: parse_enum(&row.get::<_, String>(3)?)?,
                    sender_id: row.get(4)?,
                    sender_username: row.get(5)?,
                    sender_display_name: row.get(6)?,
                    kind: parse_enum(&row.get::<_, String>(7)?)?,
                    text: row.get(8)?,
                    media: parse_json(row.get(9)?)?,
                    received_at: parse_timestamp(&row.get::<_, String>(10)?)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Returns a chat's outgoing messages in send order.
pub async fn outgoing_for_chat(
    db: &Database,
    channel_id: &str,
    chat_id: i64,
) -> Result<Vec<OutgoingMessage>, BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, provider_message_id, chat_id, kind, text, media,
                        provenance, reply_to_provider_message_id, sent_at
                 FROM outgoing_messages
                 WHERE channel_id = ?1 AND chat_id = ?2
                 ORDER BY sent_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![channel_id, chat_id], |row| {
                Ok(OutgoingMessage {
                    channel_id: row.get(0)?,
                    provider_message_id: row.get(1)?,
                    chat_id: row.get(2)?,
                    kind: parse_enum(&row.get::<_, String>(3)?)?,
                    text: row.get(4)?,
                    media: parse_json(row.get(5)?)?,
                    provenance: parse_enum(&row.get::<_, String>(6)?)?,
                    reply_to_provider_message_id: row.get(7)?,
                    sent_at: parse_timestamp(&row.get::<_, String>(8)?)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use botline_core::types::{ChatKind, MessageKind, Provenance};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_inbound(provider_message_id: i64, text: &str) -> InboundMessage {
        InboundMessage {
            channel_id: "main".into(),
            provider_message_id,
            chat_id: 555,
            chat_kind: ChatKind::Direct,
            sender_id: Some(777),
            sender_username: Some("ana".into()),
            sender_display_name: Some("Ana".into()),
            kind: MessageKind::Text,
            text: Some(text.into()),
            media: None,
            received_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn first_delivery_inserts() {
        let (db, _dir) = setup_db().await;
        let outcome = upsert_inbound(&db, &make_inbound(100, "hello")).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn redelivery_is_duplicate_and_does_not_duplicate_rows() {
        let (db, _dir) = setup_db().await;

        let first = upsert_inbound(&db, &make_inbound(100, "hello")).await.unwrap();
        assert_eq!(first, UpsertOutcome::Inserted);

        // Redelivery with edited text: last write wins.
        let second = upsert_inbound(&db, &make_inbound(100, "hello (edited)"))
            .await
            .unwrap();
        assert_eq!(second, UpsertOutcome::Duplicate);

        let stored = inbound_for_chat(&db, "main", 555).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text.as_deref(), Some("hello (edited)"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_message_id_in_different_chats_is_distinct() {
        let (db, _dir) = setup_db().await;

        let mut other_chat = make_inbound(100, "hi");
        other_chat.chat_id = 556;

        upsert_inbound(&db, &make_inbound(100, "hi")).await.unwrap();
        let outcome = upsert_inbound(&db, &other_chat).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn outgoing_round_trip_preserves_provenance() {
        let (db, _dir) = setup_db().await;

        let out = OutgoingMessage {
            channel_id: "main".into(),
            provider_message_id: Some(42),
            chat_id: 555,
            kind: MessageKind::Text,
            text: Some("Diskon 20%!".into()),
            media: None,
            provenance: Provenance::RuleEngine,
            reply_to_provider_message_id: Some(100),
            sent_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 1).unwrap(),
        };
        record_outgoing(&db, &out).await.unwrap();

        let stored = outgoing_for_chat(&db, "main", 555).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].provenance, Provenance::RuleEngine);
        assert_eq!(stored[0].reply_to_provider_message_id, Some(100));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn media_descriptor_round_trips_as_json() {
        let (db, _dir) = setup_db().await;

        let mut msg = make_inbound(200, "caption");
        msg.kind = MessageKind::Photo;
        msg.media = Some(serde_json::json!({"file_id": "abc", "width": 1280}));
        upsert_inbound(&db, &msg).await.unwrap();

        let stored = inbound_for_chat(&db, "main", 555).await.unwrap();
        assert_eq!(stored[0].media.as_ref().unwrap()["file_id"], "abc");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_duplicate_deliveries_yield_one_row() {
        let (db, _dir) = setup_db().await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                upsert_inbound(&db, &make_inbound(300, "raced")).await
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == UpsertOutcome::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1, "exactly one delivery may observe Inserted");

        let stored = inbound_for_chat(&db, "main", 555).await.unwrap();
        assert_eq!(stored.len(), 1);

        db.close().await.unwrap();
    }
}
