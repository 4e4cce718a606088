// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Botline dispatch engine.
//!
//! Implements [`botline_core::ChannelApi`] as a thin, stateless reqwest
//! client over the Bot API, and provides the webhook payload types plus
//! the pure message-kind classifier used at ingestion.

pub mod client;
pub mod ingest;
pub mod types;

pub use client::TelegramClient;
pub use ingest::{Classified, chat_kind, classify, to_inbound};
pub use types::{Chat, Message, Update, User};
