//! Core types: chat, user, access levels, raw updates, the normalized inbound
//! event, command descriptors, and the pipeline traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HandlerFailure;
use crate::response::BotResponse;

/// Conversation identifier. Positive ids are private chats with a single
/// user, negative ids are groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Chat {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    /// True for a one-on-one chat.
    pub fn is_private(&self) -> bool {
        self.id > 0
    }
}

/// Sender identity. `display_name` is only used for audit logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub display_name: String,
}

impl User {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Ordered authorization tiers. The derived ordering follows declaration
/// order, so `Banned < Newcomer < ... < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AccessLevel {
    Banned,
    Newcomer,
    Familiar,
    Trusted,
    Moderator,
    Admin,
}

impl AccessLevel {
    /// All levels in ascending order. Used by authorization tests and the
    /// settings command's help output.
    pub const ALL: [AccessLevel; 6] = [
        AccessLevel::Banned,
        AccessLevel::Newcomer,
        AccessLevel::Familiar,
        AccessLevel::Trusted,
        AccessLevel::Moderator,
        AccessLevel::Admin,
    ];
}

/// A new message straight off the transport, before normalization.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub chat: Chat,
    pub user: User,
    pub text: String,
    pub message_id: i32,
    pub sent_at: DateTime<Utc>,
}

/// A button press straight off the transport. `data` is the opaque callback
/// payload attached to the pressed button.
#[derive(Debug, Clone)]
pub struct RawCallback {
    pub chat: Chat,
    pub user: User,
    pub data: String,
    pub message_id: i32,
}

/// The three inbound shapes the pipeline accepts. Anything else is dropped
/// by the transport adapter before a `RawUpdate` is built.
#[derive(Debug, Clone)]
pub enum RawUpdate {
    Message(RawMessage),
    EditedMessage {
        message: RawMessage,
        edited_at: DateTime<Utc>,
    },
    Callback(RawCallback),
}

/// Canonical inbound event produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat: Chat,
    pub user: User,
    pub text: String,
    pub is_callback: bool,
    /// Transport id of the originating message; replies are addressed to it.
    pub message_id: i32,
}

/// Immutable description of a registered command: every recognized name
/// variant, the handler registration key, and the minimum access level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Canonical name, also the default recognized trigger.
    pub name: String,
    /// Localized display names, recognized as triggers alongside `name`.
    pub localized_names: Vec<String>,
    /// Key into the executor's handler registration map.
    pub handler: String,
    pub min_level: AccessLevel,
    pub help: String,
    /// Marks the administration command. It can never be disabled per chat
    /// and its name variants can never be aliased.
    pub settings: bool,
}

impl CommandDescriptor {
    pub fn new(
        name: impl Into<String>,
        handler: impl Into<String>,
        min_level: AccessLevel,
    ) -> Self {
        Self {
            name: name.into(),
            localized_names: Vec::new(),
            handler: handler.into(),
            min_level,
            help: String::new(),
            settings: false,
        }
    }

    /// Adds a localized trigger name.
    pub fn with_localized(mut self, name: impl Into<String>) -> Self {
        self.localized_names.push(name.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Marks this descriptor as the administration command.
    pub fn as_settings(mut self) -> Self {
        self.settings = true;
        self
    }

    /// Canonical name followed by localized variants.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.localized_names.iter().map(String::as_str))
    }
}

/// A command implementation.
///
/// `args` is the text after the command name (or the full raw text when the
/// event resumed a waiting state); `pending_payload` carries the continuation
/// payload stored by a previous step of a multi-step flow, if any.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(
        &self,
        event: &InboundEvent,
        args: &str,
        pending_payload: Option<&str>,
    ) -> Result<Vec<BotResponse>, HandlerFailure>;
}

/// Passive observer run on every event in arrival order, regardless of
/// command resolution. Failures are contained per analyzer.
#[async_trait]
pub trait MessageAnalyzer: Send + Sync {
    async fn analyze(&self, event: &InboundEvent) -> anyhow::Result<()>;
}

/// Counter sink for pipeline bookkeeping. Implementations must be safe to
/// call from concurrent tasks.
pub trait StatsSink: Send + Sync {
    fn increment_received(&self);
    fn increment_command(&self, chat: &Chat, user: &User, command: &str);
    fn increment_processed(&self);
    fn increment_error(&self, context: &str, cause: &str, note: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_is_private() {
        assert!(Chat::new(42).is_private());
        assert!(!Chat::new(-100).is_private());
    }

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Banned < AccessLevel::Newcomer);
        assert!(AccessLevel::Newcomer < AccessLevel::Admin);
        let mut sorted = AccessLevel::ALL;
        sorted.sort();
        assert_eq!(sorted, AccessLevel::ALL);
    }

    #[test]
    fn test_descriptor_all_names() {
        let cmd = CommandDescriptor::new("weather", "weather", AccessLevel::Newcomer)
            .with_localized("погода");
        let names: Vec<&str> = cmd.all_names().collect();
        assert_eq!(names, vec!["weather", "погода"]);
    }
}
