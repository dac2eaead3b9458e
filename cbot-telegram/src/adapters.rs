//! Adapters from Telegram (teloxide) update types to core raw updates.
//! Depends only on teloxide and cbot_core type definitions.

use cbot_core::{Chat, RawCallback, RawMessage, RawUpdate, User};
use chrono::Utc;
use teloxide::types::{MaybeInaccessibleMessage, MessageKind, Update, UpdateKind};

/// Converts a teloxide update to a [`RawUpdate`], or `None` for every
/// update kind the pipeline does not accept (inline queries, member
/// changes, channel posts, ...).
pub fn to_raw_update(update: Update) -> Option<RawUpdate> {
    match update.kind {
        UpdateKind::Message(message) => to_raw_message(&message).map(RawUpdate::Message),
        UpdateKind::EditedMessage(message) => {
            let raw = to_raw_message(&message)?;
            let edited_at = match &message.kind {
                MessageKind::Common(common) => common.edit_date.unwrap_or_else(Utc::now),
                _ => Utc::now(),
            };
            Some(RawUpdate::EditedMessage {
                message: raw,
                edited_at,
            })
        }
        UpdateKind::CallbackQuery(query) => {
            let message = match query.message {
                Some(MaybeInaccessibleMessage::Regular(message)) => message,
                _ => return None,
            };
            Some(RawUpdate::Callback(RawCallback {
                chat: Chat::new(message.chat.id.0),
                user: to_core_user(&query.from),
                data: query.data.unwrap_or_default(),
                message_id: message.id.0,
            }))
        }
        _ => None,
    }
}

fn to_raw_message(message: &teloxide::types::Message) -> Option<RawMessage> {
    let from = message.from.as_ref()?;
    let text = message.text()?;
    Some(RawMessage {
        chat: Chat::new(message.chat.id.0),
        user: to_core_user(from),
        text: text.to_string(),
        message_id: message.id.0,
        sent_at: message.date,
    })
}

/// Display name preference: @username, else the full name.
pub fn to_core_user(user: &teloxide::types::User) -> User {
    let display_name = user
        .username
        .as_ref()
        .map(|name| format!("@{}", name))
        .unwrap_or_else(|| user.full_name());
    User::new(user.id.0 as i64, display_name)
}
