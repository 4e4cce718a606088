// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact directory operations.

use botline_core::BotlineError;
use botline_core::types::Contact;
use rusqlite::params;

use crate::database::{Database, map_tr_err, parse_enum, parse_timestamp};

/// Creates or refreshes the contact row for `(channel_id, chat_id)`.
///
/// The `COALESCE(excluded.x, x)` form keeps stored display fields when
/// the incoming message carries none, so a later anonymous update never
/// erases a known name.
pub async fn upsert_contact(db: &Database, contact: &Contact) -> Result<(), BotlineError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO contacts
                     (channel_id, chat_id, chat_kind, first_name, last_name, username,
                      last_message_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (channel_id, chat_id) DO UPDATE SET
                     chat_kind = excluded.chat_kind,
                     first_name = COALESCE(excluded.first_name, first_name),
                     last_name = COALESCE(excluded.last_name, last_name),
                     username = COALESCE(excluded.username, username),
                     last_message_at = excluded.last_message_at",
                params![
                    contact.channel_id,
                    contact.chat_id,
                    contact.chat_kind.to_string(),
                    contact.first_name,
                    contact.last_name,
                    contact.username,
                    contact.last_message_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Looks up one contact by its key.
pub async fn get_contact(
    db: &Database,
    channel_id: &str,
    chat_id: i64,
) -> Result<Option<Contact>, BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn
                .query_row(
                    "SELECT channel_id, chat_id, chat_kind, first_name, last_name, username,
                            last_message_at
                     FROM contacts WHERE channel_id = ?1 AND chat_id = ?2",
                    params![channel_id, chat_id],
                    |row| {
                        Ok(Contact {
                            channel_id: row.get(0)?,
                            chat_id: row.get(1)?,
                            chat_kind: parse_enum(&row.get::<_, String>(2)?)?,
                            first_name: row.get(3)?,
                            last_name: row.get(4)?,
                            username: row.get(5)?,
                            last_message_at: parse_timestamp(&row.get::<_, String>(6)?)?,
                        })
                    },
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;
            Ok(result)
        })
        .await
        .map_err(map_tr_err)
}
