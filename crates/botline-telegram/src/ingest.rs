// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification and normalization into channel-agnostic types.
//!
//! [`classify`] decides a message's kind exactly once, by field presence
//! in fixed precedence; everything downstream pattern-matches on the
//! resulting [`MessageKind`] instead of re-probing the raw payload.

use botline_core::types::{ChatKind, InboundMessage, MessageKind};
use chrono::{DateTime, Utc};

use crate::types::Message;

/// Classification of a raw message payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub kind: MessageKind,
    /// Message body for text, caption for media kinds.
    pub text: Option<String>,
    /// Opaque media descriptor (for photos, the highest-resolution size).
    pub media: Option<serde_json::Value>,
}

/// Classifies a message by payload field presence.
///
/// Fixed precedence, first match wins: photo > document > video > audio
/// > voice > sticker > text. A photo with a caption classifies as
/// `Photo` with the caption as text, never as `Text`.
pub fn classify(msg: &Message) -> Classified {
    if let Some(photos) = msg.photo.as_ref()
        && let Some(largest) = photos.last()
    {
        return media_kind(MessageKind::Photo, msg, largest.clone());
    }
    if let Some(doc) = msg.document.as_ref() {
        return media_kind(MessageKind::Document, msg, doc.clone());
    }
    if let Some(video) = msg.video.as_ref() {
        return media_kind(MessageKind::Video, msg, video.clone());
    }
    if let Some(audio) = msg.audio.as_ref() {
        return media_kind(MessageKind::Audio, msg, audio.clone());
    }
    if let Some(voice) = msg.voice.as_ref() {
        return media_kind(MessageKind::Voice, msg, voice.clone());
    }
    if let Some(sticker) = msg.sticker.as_ref() {
        return media_kind(MessageKind::Sticker, msg, sticker.clone());
    }

    Classified {
        kind: MessageKind::Text,
        text: msg.text.clone(),
        media: None,
    }
}

fn media_kind(kind: MessageKind, msg: &Message, descriptor: serde_json::Value) -> Classified {
    Classified {
        kind,
        text: msg.caption.clone(),
        media: Some(descriptor),
    }
}

/// Maps the provider chat type string onto [`ChatKind`].
///
/// Groups and supergroups collapse to `Group`; anything unrecognized is
/// treated as `Direct`.
pub fn chat_kind(provider_type: &str) -> ChatKind {
    match provider_type {
        "group" | "supergroup" => ChatKind::Group,
        "channel" => ChatKind::Channel,
        _ => ChatKind::Direct,
    }
}

/// Normalizes a raw message into the channel-agnostic [`InboundMessage`].
pub fn to_inbound(channel_id: &str, msg: &Message) -> InboundMessage {
    let classified = classify(msg);

    let sender_display_name = msg.from.as_ref().and_then(|u| {
        let name = [u.first_name.as_deref(), u.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { None } else { Some(name) }
    });

    let received_at = DateTime::<Utc>::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now);

    InboundMessage {
        channel_id: channel_id.to_string(),
        provider_message_id: msg.message_id,
        chat_id: msg.chat.id,
        chat_kind: chat_kind(&msg.chat.kind),
        sender_id: msg.from.as_ref().map(|u| u.id),
        sender_username: msg.from.as_ref().and_then(|u| u.username.clone()),
        sender_display_name,
        kind: classified.kind,
        text: classified.text,
        media: classified.media,
        received_at,
    }
}
