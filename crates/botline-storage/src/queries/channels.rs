// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel liveness tracking.

use botline_core::BotlineError;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::{Database, map_tr_err, parse_timestamp};

/// Records the last webhook delivery timestamp for a channel.
pub async fn touch_channel(
    db: &Database,
    channel_id: &str,
    at: DateTime<Utc>,
) -> Result<(), BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO channels (id, last_webhook_at) VALUES (?1, ?2)
                 ON CONFLICT (id) DO UPDATE SET last_webhook_at = excluded.last_webhook_at",
                params![channel_id, at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Returns the channel's last webhook delivery timestamp, if any.
pub async fn channel_liveness(
    db: &Database,
    channel_id: &str,
) -> Result<Option<DateTime<Utc>>, BotlineError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn
                .query_row(
                    "SELECT last_webhook_at FROM channels WHERE id = ?1",
                    params![channel_id],
                    |row| {
                        let raw: Option<String> = row.get(0)?;
                        raw.map(|s| parse_timestamp(&s)).transpose()
                    },
                )
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;
            Ok(result)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[tokio::test]
    async fn touch_creates_then_advances() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        assert!(channel_liveness(&db, "main").await.unwrap().is_none());

        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 1, 11, 0, 0).unwrap();
        touch_channel(&db, "main", t1).await.unwrap();
        touch_channel(&db, "main", t2).await.unwrap();

        assert_eq!(channel_liveness(&db, "main").await.unwrap(), Some(t2));
        db.close().await.unwrap();
    }
}
