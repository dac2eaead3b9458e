//! Typed handler output and the sender trait the response router dispatches on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Chat;

/// Dispatch key matching a response to the output sender able to deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    Text,
    Document,
    DocumentGroup,
    Location,
    EditKeyboard,
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResponseKind::Text => "text",
            ResponseKind::Document => "document",
            ResponseKind::DocumentGroup => "document_group",
            ResponseKind::Location => "location",
            ResponseKind::EditKeyboard => "edit_keyboard",
        };
        f.write_str(name)
    }
}

/// Plain text reply, optionally addressed to the originating message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub chat: Chat,
    pub text: String,
    pub reply_to: Option<i32>,
}

/// A file to deliver, held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub chat: Chat,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub chat: Chat,
    pub latitude: f64,
    pub longitude: f64,
}

/// One inline button: visible label plus the opaque payload delivered back
/// as a callback when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub label: String,
    pub callback_data: String,
}

/// Replaces the inline keyboard of an already-sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEditResponse {
    pub chat: Chat,
    pub message_id: i32,
    pub rows: Vec<Vec<KeyboardButton>>,
}

/// Everything a command handler can produce. The router matches on
/// [`BotResponse::kind`] to pick a sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BotResponse {
    Text(TextResponse),
    Document(DocumentResponse),
    DocumentGroup(Vec<DocumentResponse>),
    Location(LocationResponse),
    EditKeyboard(KeyboardEditResponse),
}

impl BotResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            BotResponse::Text(_) => ResponseKind::Text,
            BotResponse::Document(_) => ResponseKind::Document,
            BotResponse::DocumentGroup(_) => ResponseKind::DocumentGroup,
            BotResponse::Location(_) => ResponseKind::Location,
            BotResponse::EditKeyboard(_) => ResponseKind::EditKeyboard,
        }
    }

    /// Plain text message to a chat.
    pub fn text(chat: Chat, text: impl Into<String>) -> Self {
        BotResponse::Text(TextResponse {
            chat,
            text: text.into(),
            reply_to: None,
        })
    }

    /// Text addressed as a reply to a specific message.
    pub fn reply(chat: Chat, message_id: i32, text: impl Into<String>) -> Self {
        BotResponse::Text(TextResponse {
            chat,
            text: text.into(),
            reply_to: Some(message_id),
        })
    }
}

/// Output sender provided by the transport adapter. Each sender declares the
/// response kinds it can deliver; the router invokes `send` for matches.
#[async_trait]
pub trait ResponseSender: Send + Sync {
    fn kinds(&self) -> &[ResponseKind];
    async fn send(&self, response: &BotResponse) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_kind() {
        let r = BotResponse::text(Chat::new(1), "hi");
        assert_eq!(r.kind(), ResponseKind::Text);
        let r = BotResponse::DocumentGroup(vec![]);
        assert_eq!(r.kind(), ResponseKind::DocumentGroup);
    }

    #[test]
    fn test_reply_carries_message_id() {
        match BotResponse::reply(Chat::new(1), 77, "hi") {
            BotResponse::Text(t) => assert_eq!(t.reply_to, Some(77)),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
