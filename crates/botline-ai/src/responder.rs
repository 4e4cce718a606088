// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI reply generation with graceful degradation.
//!
//! [`AiResponder::reply`] never fails: any provider error collapses to
//! a fixed user-facing string so the dispatch pipeline can always send
//! something. Failed exchanges are not written back to history, so a
//! transient provider outage cannot poison later context.

use botline_core::BotlineError;
use botline_core::types::ReplyOverrides;
use tracing::{debug, warn};

use crate::client::AnthropicClient;
use crate::history::{HistoryCache, Turn};
use crate::prompts::PromptResolver;
use crate::types::{ApiMessage, MessageRequest};

/// Sent when the provider reports quota or billing exhaustion.
const UNAVAILABLE_REPLY: &str =
    "The assistant is temporarily unavailable. Please try again in a little while.";

/// Sent on any other generation failure.
const FALLBACK_REPLY: &str = "Sorry, I couldn't process that message right now.";

/// Generates AI auto-replies with per-session conversation memory.
pub struct AiResponder {
    client: AnthropicClient,
    history: HistoryCache,
    prompts: PromptResolver,
    default_max_tokens: u32,
}

impl AiResponder {
    pub fn new(
        client: AnthropicClient,
        history: HistoryCache,
        prompts: PromptResolver,
        default_max_tokens: u32,
    ) -> Self {
        Self {
            client,
            history,
            prompts,
            default_max_tokens,
        }
    }

    /// Generates a reply to `text` within the session's conversation.
    ///
    /// Always returns a sendable string. On success the exchange is
    /// appended to the session history; on failure history is left
    /// untouched and a fixed fallback string is returned.
    pub async fn reply(
        &self,
        session_key: &str,
        text: &str,
        profile: &str,
        overrides: &ReplyOverrides,
    ) -> String {
        let system = self
            .prompts
            .resolve(profile, overrides.system_prompt.as_deref())
            .await;

        let mut turns = self.history.load(session_key);
        turns.push(Turn::user(text));

        let request = MessageRequest {
            model: self.client.default_model().to_string(),
            messages: turns
                .iter()
                .map(|t| ApiMessage {
                    role: t.role.as_str().to_string(),
                    content: t.content.clone(),
                })
                .collect(),
            system: Some(system),
            max_tokens: overrides.max_tokens.unwrap_or(self.default_max_tokens),
            temperature: overrides.temperature,
            stream: false,
        };

        match self.client.complete_message(&request).await {
            Ok(response) => {
                let reply = response.text();
                if reply.trim().is_empty() {
                    warn!(session_key, "provider returned an empty completion");
                    return FALLBACK_REPLY.to_string();
                }
                debug!(
                    session_key,
                    output_tokens = response.usage.output_tokens,
                    "generated AI reply"
                );
                turns.push(Turn::assistant(reply.clone()));
                self.history.store(session_key, turns);
                reply
            }
            Err(e) => {
                warn!(session_key, error = %e, "AI reply generation failed");
                if is_quota_exhaustion(&e) {
                    UNAVAILABLE_REPLY.to_string()
                } else {
                    FALLBACK_REPLY.to_string()
                }
            }
        }
    }
}

/// Detects quota and billing exhaustion from the provider error surface.
fn is_quota_exhaustion(err: &BotlineError) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("rate_limit_error")
        || msg.contains("overloaded_error")
        || msg.contains("billing")
        || msg.contains("credit balance")
        || msg.contains("quota")
}
