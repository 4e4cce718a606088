// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound channel API trait for messaging provider integrations.

use async_trait::async_trait;

use crate::types::ApiOutcome;

/// Thin client surface over a messaging provider's HTTP API.
///
/// Implementations own no state beyond an HTTP client; every call is one
/// request/response with a bounded timeout. Calls never raise: transport
/// and provider-level failures are both folded into [`ApiOutcome`], and
/// callers decide whether a failure aborts their own flow.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Sends a plain text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> ApiOutcome;

    /// Sends a photo by URL or provider file id, with an optional caption.
    async fn send_photo(&self, chat_id: i64, photo: &str, caption: Option<&str>) -> ApiOutcome;

    /// Sends a document by URL or provider file id, with an optional caption.
    async fn send_document(&self, chat_id: i64, document: &str, caption: Option<&str>)
    -> ApiOutcome;

    /// Fetches the bot/account identity (a liveness and credential check).
    async fn get_identity(&self) -> ApiOutcome;

    /// Registers the webhook delivery URL, optionally with a secret token.
    async fn set_webhook(&self, url: &str, secret: Option<&str>) -> ApiOutcome;

    /// Removes the registered webhook.
    async fn delete_webhook(&self) -> ApiOutcome;

    /// Queries the current webhook registration state.
    async fn get_webhook_info(&self) -> ApiOutcome;
}
