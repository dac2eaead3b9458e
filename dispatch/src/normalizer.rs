//! Event normalization: folds the three raw inbound shapes into one
//! [`InboundEvent`] and suppresses stale edits.

use cbot_core::{InboundEvent, RawUpdate};
use chrono::Duration;
use tracing::debug;

/// Edits older than this are assumed incidental (e.g. link-preview
/// population) and must not re-trigger command execution.
pub fn stale_edit_threshold() -> Duration {
    Duration::seconds(15)
}

/// Converts a raw update into the canonical event, or drops it.
///
/// An edited message is dropped when its edit timestamp minus the original
/// send timestamp exceeds the staleness threshold. Callback data becomes the
/// event text with `is_callback` set.
pub fn normalize(update: RawUpdate) -> Option<InboundEvent> {
    match update {
        RawUpdate::Message(message) => Some(InboundEvent {
            chat: message.chat,
            user: message.user,
            text: message.text,
            is_callback: false,
            message_id: message.message_id,
        }),
        RawUpdate::EditedMessage { message, edited_at } => {
            if edited_at - message.sent_at > stale_edit_threshold() {
                debug!(
                    chat_id = message.chat.id,
                    user_id = message.user.id,
                    "Dropped stale edited message"
                );
                return None;
            }
            Some(InboundEvent {
                chat: message.chat,
                user: message.user,
                text: message.text,
                is_callback: false,
                message_id: message.message_id,
            })
        }
        RawUpdate::Callback(callback) => Some(InboundEvent {
            chat: callback.chat,
            user: callback.user,
            text: callback.data,
            is_callback: true,
            message_id: callback.message_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbot_core::{Chat, RawCallback, RawMessage, User};
    use chrono::Utc;

    fn raw_message(text: &str) -> RawMessage {
        RawMessage {
            chat: Chat::new(1),
            user: User::new(2, "tester"),
            text: text.to_string(),
            message_id: 10,
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_message_normalized() {
        let event = normalize(RawUpdate::Message(raw_message("hello"))).unwrap();
        assert_eq!(event.text, "hello");
        assert!(!event.is_callback);
        assert_eq!(event.message_id, 10);
    }

    #[test]
    fn test_fresh_edit_processed() {
        let message = raw_message("fixed typo");
        let edited_at = message.sent_at + Duration::seconds(15);
        let event = normalize(RawUpdate::EditedMessage { message, edited_at });
        assert!(event.is_some());
    }

    #[test]
    fn test_stale_edit_dropped() {
        let message = raw_message("fixed typo");
        let edited_at = message.sent_at + Duration::seconds(16);
        let event = normalize(RawUpdate::EditedMessage { message, edited_at });
        assert!(event.is_none());
    }

    #[test]
    fn test_callback_becomes_text_event() {
        let event = normalize(RawUpdate::Callback(RawCallback {
            chat: Chat::new(1),
            user: User::new(2, "tester"),
            data: "weather refresh".to_string(),
            message_id: 7,
        }))
        .unwrap();
        assert!(event.is_callback);
        assert_eq!(event.text, "weather refresh");
        assert_eq!(event.message_id, 7);
    }
}
