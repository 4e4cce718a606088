// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Botline dispatch engine.
//!
//! The pipeline depends only on these seams, so tests run against
//! in-memory fakes and production wires in the Telegram and SQLite
//! adapters. All traits use `#[async_trait]` for dynamic dispatch.

pub mod channel;
pub mod store;

pub use channel::ChannelApi;
pub use store::ConversationStore;
