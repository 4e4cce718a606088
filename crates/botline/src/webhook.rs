// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `botline webhook` command implementation.

use botline_config::model::BotlineConfig;
use botline_core::types::ApiOutcome;
use botline_core::{BotlineError, ChannelApi};
use botline_telegram::TelegramClient;

use crate::WebhookAction;

/// Runs the `botline webhook set|delete|info` commands.
pub async fn run_webhook(
    config: BotlineConfig,
    action: WebhookAction,
) -> Result<(), BotlineError> {
    let token = config.telegram.bot_token.clone().ok_or_else(|| {
        BotlineError::Config("telegram.bot_token is required for webhook commands".into())
    })?;
    let client = TelegramClient::new(token)?;

    let outcome = match action {
        WebhookAction::Set => {
            let url = config.telegram.webhook_url.as_deref().ok_or_else(|| {
                BotlineError::Config("telegram.webhook_url is required for webhook set".into())
            })?;
            client
                .set_webhook(url, config.telegram.webhook_secret.as_deref())
                .await
        }
        WebhookAction::Delete => client.delete_webhook().await,
        WebhookAction::Info => client.get_webhook_info().await,
    };

    match outcome {
        ApiOutcome::Success { result } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
            );
            Ok(())
        }
        ApiOutcome::Failure { error } => Err(BotlineError::Channel {
            message: format!("webhook command failed: {error}"),
            source: None,
        }),
    }
}
