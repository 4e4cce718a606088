// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `botline broadcast` command implementation.

use std::time::Duration;

use botline_config::model::BotlineConfig;
use botline_core::BotlineError;
use botline_core::types::ResponseKind;
use botline_storage::SqliteStore;
use botline_telegram::TelegramClient;
use tracing::info;

use crate::BroadcastArgs;

/// Runs the `botline broadcast` command.
pub async fn run_broadcast(
    config: BotlineConfig,
    args: BroadcastArgs,
) -> Result<(), BotlineError> {
    let token = config.telegram.bot_token.clone().ok_or_else(|| {
        BotlineError::Config("telegram.bot_token is required for broadcast".into())
    })?;
    let client = TelegramClient::new(token)?;
    let store = SqliteStore::open(&config.storage.database_path).await?;

    let (kind, media) = if let Some(photo) = args.photo.as_deref() {
        (ResponseKind::Photo, Some(photo))
    } else if let Some(document) = args.document.as_deref() {
        (ResponseKind::Document, Some(document))
    } else {
        (ResponseKind::Text, None)
    };

    info!(
        recipients = args.to.len(),
        pacing_ms = config.broadcast.pacing_ms,
        "starting broadcast"
    );

    let report = botline_dispatch::broadcast(
        &client,
        &store,
        &config.channel.id,
        &args.to,
        kind,
        &args.text,
        media,
        Duration::from_millis(config.broadcast.pacing_ms),
    )
    .await;

    println!("sent: {}, failed: {}", report.sent, report.failed);
    for (chat_id, error) in &report.errors {
        println!("  chat {chat_id}: {error}");
    }

    store.close().await?;
    Ok(())
}
