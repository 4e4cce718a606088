// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Botline dispatch engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level Botline configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotlineConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Per-channel reply routing settings.
    #[serde(default)]
    pub channel: ChannelSection,

    /// Anthropic API settings for the AI responder.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// AI conversation history cache settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Named assistant profile prompts, keyed by profile name.
    #[serde(default)]
    pub profiles: HashMap<String, String>,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Broadcast fan-out settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "botline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram adapter.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Public HTTPS URL the provider delivers webhooks to.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Secret token echoed back by the provider in the
    /// `X-Telegram-Bot-Api-Secret-Token` header.
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

/// Per-channel reply routing configuration.
///
/// Snapshotted into an immutable `ChannelConfig` value per webhook
/// invocation, so concurrent updates never observe toggles mid-flight.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    /// Logical channel identifier scoping contacts, rules, and history.
    #[serde(default = "default_channel_id")]
    pub id: String,

    /// Whether the auto-reply rule engine evaluates inbound text.
    #[serde(default = "default_true")]
    pub rule_engine_enabled: bool,

    /// Whether unmatched text falls back to the AI responder.
    #[serde(default)]
    pub ai_engine_enabled: bool,

    /// Assistant profile name used for system-prompt resolution.
    #[serde(default = "default_assistant_profile")]
    pub assistant_profile: String,

    /// Explicit system prompt override (beats profile resolution).
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Sampling temperature override for AI replies.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Max-tokens override for AI replies.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            id: default_channel_id(),
            rule_engine_enabled: default_true(),
            ai_engine_enabled: false,
            assistant_profile: default_assistant_profile(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_channel_id() -> String {
    "telegram-main".to_string()
}

fn default_assistant_profile() -> String {
    "assistant".to_string()
}

fn default_true() -> bool {
    true
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model to use for AI replies.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// AI conversation history cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum remembered exchange pairs per session (bound = 2x this).
    #[serde(default = "default_max_exchanges")]
    pub max_exchanges: usize,

    /// Sliding inactivity TTL for a session's history, in seconds.
    #[serde(default = "default_history_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_exchanges: default_max_exchanges(),
            ttl_secs: default_history_ttl_secs(),
        }
    }
}

fn default_max_exchanges() -> usize {
    10
}

fn default_history_ttl_secs() -> u64 {
    3600
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("botline").join("botline.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("botline.db"))
        .to_string_lossy()
        .into_owned()
}

/// Webhook gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8787
}

/// Broadcast fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Fixed inter-send pacing delay between recipients, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
        }
    }
}

fn default_pacing_ms() -> u64 {
    100
}
