// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential broadcast fan-out.
//!
//! Deliberately one send at a time with fixed pacing between sends, so a
//! broadcast never trips provider flood limits. One bad recipient (blocked
//! bot, deleted chat) must not stop the rest; errors are collected per
//! chat and the aggregate is returned only after every recipient was
//! attempted.

use std::collections::BTreeMap;
use std::time::Duration;

use botline_core::types::{MessageKind, OutgoingMessage, Provenance, ResponseKind};
use botline_core::{ChannelApi, ConversationStore};
use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

/// Aggregate outcome of a broadcast run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    /// Provider or transport error per failed chat id.
    pub errors: BTreeMap<i64, String>,
}

/// Sends `body` (and optional media) to every recipient in order.
#[allow(clippy::too_many_arguments)]
pub async fn broadcast(
    channel: &dyn ChannelApi,
    store: &dyn ConversationStore,
    channel_id: &str,
    recipients: &[i64],
    kind: ResponseKind,
    body: &str,
    media: Option<&str>,
    pacing: Duration,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    for (i, &chat_id) in recipients.iter().enumerate() {
        let outcome = match kind {
            ResponseKind::Text => channel.send_text(chat_id, body).await,
            ResponseKind::Photo => {
                channel
                    .send_photo(chat_id, media.unwrap_or_default(), Some(body))
                    .await
            }
            ResponseKind::Document => {
                channel
                    .send_document(chat_id, media.unwrap_or_default(), Some(body))
                    .await
            }
        };

        if outcome.is_success() {
            report.sent += 1;
            counter!("botline_broadcast_sent_total").increment(1);
            let record = OutgoingMessage {
                channel_id: channel_id.to_string(),
                provider_message_id: outcome.message_id(),
                chat_id,
                kind: match kind {
                    ResponseKind::Text => MessageKind::Text,
                    ResponseKind::Photo => MessageKind::Photo,
                    ResponseKind::Document => MessageKind::Document,
                },
                text: Some(body.to_string()),
                media: media.map(|m| serde_json::Value::String(m.to_string())),
                provenance: Provenance::Human,
                reply_to_provider_message_id: None,
                sent_at: Utc::now(),
            };
            // The send already happened; a failed record keeps the count.
            if let Err(e) = store.record_outgoing(&record).await {
                warn!(chat_id, error = %e, "failed to record broadcast send");
            }
        } else {
            report.failed += 1;
            counter!("botline_broadcast_failed_total").increment(1);
            let error = outcome.error().unwrap_or("unknown error").to_string();
            warn!(chat_id, error = %error, "broadcast send failed");
            report.errors.insert(chat_id, error);
        }

        // Pace between sends, not after the last one.
        if i + 1 < recipients.len() {
            tokio::time::sleep(pacing).await;
        }
    }

    info!(
        sent = report.sent,
        failed = report.failed,
        recipients = recipients.len(),
        "broadcast complete"
    );
    report
}
