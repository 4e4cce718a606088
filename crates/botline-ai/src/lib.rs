// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI auto-reply engine backed by the Anthropic Messages API.
//!
//! Pairs a non-streaming API client with bounded in-memory conversation
//! history and profile-based system prompt resolution. The public entry
//! point is [`AiResponder`], whose `reply` never fails; provider errors
//! degrade to fixed user-facing fallback strings.

pub mod client;
pub mod history;
pub mod prompts;
pub mod responder;
pub mod types;

pub use client::AnthropicClient;
pub use history::{HistoryCache, Role, Turn, session_key};
pub use prompts::{ConfigPrompts, PromptResolver, PromptSource};
pub use responder::AiResponder;
