// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auto-reply rule definition queries.
//!
//! Rules are owned by account configuration; the dispatch pipeline only
//! reads them. The insert helper exists for operator tooling and tests.

use botline_core::BotlineError;
use botline_core::types::AutoReplyRule;
use rusqlite::params;

use crate::database::{Database, map_tr_err, parse_enum, parse_timestamp};

/// Inserts a rule definition and returns its id.
pub async fn insert_rule(db: &Database, rule: &AutoReplyRule) -> Result<i64, BotlineError> {
    let rule = rule.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO auto_reply_rules
                     (channel_id, trigger_pattern, match_mode, priority, active,
                      response_kind, response_body, response_media, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    rule.channel_id,
                    rule.trigger,
                    rule.match_mode.to_string(),
                    rule.priority,
                    rule.active,
                    rule.response_kind.to_string(),
                    rule.response_body,
                    rule.response_media,
                    rule.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Returns a channel's active rules in evaluation order: priority
/// descending, creation order ascending, id ascending.
pub async fn active_rules(
    db: &Database,
    channel_id: &str,
) -> Result<Vec<AutoReplyRule>, BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, channel_id, trigger_pattern, match_mode, priority, active,
                        response_kind, response_body, response_media, created_at
                 FROM auto_reply_rules
                 WHERE channel_id = ?1 AND active = 1
                 ORDER BY priority DESC, created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![channel_id], |row| {
                Ok(AutoReplyRule {
                    id: row.get(0)?,
                    channel_id: row.get(1)?,
                    trigger: row.get(2)?,
                    match_mode: parse_enum(&row.get::<_, String>(3)?)?,
                    priority: row.get(4)?,
                    active: row.get(5)?,
                    response_kind: parse_enum(&row.get::<_, String>(6)?)?,
                    response_body: row.get(7)?,
                    response_media: row.get(8)?,
                    created_at: parse_timestamp(&row.get::<_, String>(9)?)?,
                })
            })?;
            let mut rules = Vec::new();
            for row in rows {
                rules.push(row?);
            }
            Ok(rules)
        })
        .await
        .map_err(map_tr_err)
}
