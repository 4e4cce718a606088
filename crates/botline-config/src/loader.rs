// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./botline.toml` > `~/.config/botline/botline.toml`
//! > `/etc/botline/botline.toml` with environment variable overrides via the
//! `BOTLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BotlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/botline/botline.toml` (system-wide)
/// 3. `~/.config/botline/botline.toml` (user XDG config)
/// 4. `./botline.toml` (local directory)
/// 5. `BOTLINE_*` environment variables
pub fn load_config() -> Result<BotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BotlineConfig::default()))
        .merge(Toml::file("/etc/botline/botline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("botline/botline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("botline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BotlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BotlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BotlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `BOTLINE_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("BOTLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BOTLINE_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("channel_", "channel.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("history_", "history.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("broadcast_", "broadcast.", 1);
        mapped.into()
    })
}
