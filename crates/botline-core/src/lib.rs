// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Botline dispatch engine.
//!
//! This crate provides the foundational error type, domain types, and
//! adapter trait definitions used throughout the Botline workspace. The
//! channel and storage adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BotlineError;
pub use traits::{ChannelApi, ConversationStore};
pub use types::{
    ApiOutcome, AutoReplyRule, ChannelConfig, ChatKind, Contact, InboundMessage, MatchMode,
    MessageKind, OutgoingMessage, Provenance, ReplyOverrides, ResponseKind, UpsertOutcome,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn botline_error_has_all_variants() {
        let _config = BotlineError::Config("test".into());
        let _storage = BotlineError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = BotlineError::Channel {
            message: "test".into(),
            source: None,
        };
        let _provider = BotlineError::Provider {
            message: "test".into(),
            source: None,
        };
        let _timeout = BotlineError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = BotlineError::Internal("test".into());
    }

    #[test]
    fn error_display_includes_detail() {
        let err = BotlineError::Channel {
            message: "chat not found".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "channel error: chat not found");
    }

    #[test]
    fn trait_objects_are_constructible() {
        // The pipeline holds adapters as trait objects; verify object safety.
        fn _assert_channel(_: &dyn ChannelApi) {}
        fn _assert_store(_: &dyn ConversationStore) {}
    }
}
