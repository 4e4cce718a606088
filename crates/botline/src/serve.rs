// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `botline serve` command implementation.
//!
//! Wires configuration, SQLite storage, the Telegram adapter, the AI
//! responder, and the dispatch pipeline into the webhook server, then
//! runs until ctrl-c.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use botline_ai::{AiResponder, AnthropicClient, ConfigPrompts, HistoryCache, PromptResolver};
use botline_config::model::BotlineConfig;
use botline_core::types::{ChannelConfig, ReplyOverrides};
use botline_core::{BotlineError, ChannelApi};
use botline_dispatch::{Dispatcher, ReplyGenerator};
use botline_gateway::{GatewayState, ServerConfig, start_server};
use botline_storage::SqliteStore;
use botline_telegram::TelegramClient;
use tracing::{info, warn};

/// How long a configured profile prompt lookup stays cached.
const PROMPT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Runs the `botline serve` command.
pub async fn run_serve(config: BotlineConfig) -> Result<(), BotlineError> {
    info!("starting botline serve");

    let token = config.telegram.bot_token.clone().ok_or_else(|| {
        BotlineError::Config("telegram.bot_token is required for serve".into())
    })?;
    let client = Arc::new(TelegramClient::new(token)?);

    // Credential and liveness check before accepting any webhook traffic.
    let identity = client.get_identity().await;
    match &identity {
        botline_core::types::ApiOutcome::Success { result } => {
            info!(
                username = result["username"].as_str().unwrap_or("unknown"),
                "provider identity confirmed"
            );
        }
        botline_core::types::ApiOutcome::Failure { error } => {
            return Err(BotlineError::Channel {
                message: format!("identity check failed: {error}"),
                source: None,
            });
        }
    }

    let store = SqliteStore::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "storage ready");

    let responder = build_responder(&config)?;
    if config.channel.ai_engine_enabled && responder.is_none() {
        warn!("ai engine enabled but anthropic.api_key is not configured; AI replies disabled");
    }

    let channel_cfg = channel_config(&config);
    let dispatcher = Dispatcher::new(client, Arc::new(store.clone()), responder);

    let state = GatewayState {
        dispatcher: Arc::new(dispatcher),
        channels: Arc::new(HashMap::from([(
            channel_cfg.channel_id.clone(),
            channel_cfg,
        )])),
        webhook_secret: config.telegram.webhook_secret.clone(),
        start_time: std::time::Instant::now(),
    };

    let server_cfg = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    };

    start_server(&server_cfg, state, shutdown).await?;

    store.close().await?;
    info!("botline serve stopped");
    Ok(())
}

/// Builds the immutable per-invocation channel configuration snapshot.
fn channel_config(config: &BotlineConfig) -> ChannelConfig {
    ChannelConfig {
        channel_id: config.channel.id.clone(),
        rule_engine_enabled: config.channel.rule_engine_enabled,
        ai_engine_enabled: config.channel.ai_engine_enabled,
        assistant_profile: config.channel.assistant_profile.clone(),
        overrides: ReplyOverrides {
            system_prompt: config.channel.system_prompt.clone(),
            temperature: config.channel.temperature,
            max_tokens: config.channel.max_tokens,
        },
    }
}

/// Builds the AI responder when an API key is configured.
fn build_responder(
    config: &BotlineConfig,
) -> Result<Option<Arc<dyn ReplyGenerator>>, BotlineError> {
    let Some(api_key) = config.anthropic.api_key.clone() else {
        return Ok(None);
    };

    let client = AnthropicClient::new(
        api_key,
        config.anthropic.api_version.clone(),
        config.anthropic.default_model.clone(),
    )?;
    let history = HistoryCache::new(
        config.history.max_exchanges,
        Duration::from_secs(config.history.ttl_secs),
    );
    let prompts = PromptResolver::new(
        Arc::new(ConfigPrompts::new(config.profiles.clone())),
        PROMPT_CACHE_TTL,
    );

    Ok(Some(Arc::new(AiResponder::new(
        client,
        history,
        prompts,
        config.anthropic.max_tokens,
    ))))
}
