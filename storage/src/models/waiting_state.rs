//! Waiting-state model: the single-slot "this user owes a reply to a
//! specific command" record driving multi-step flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At most one live entry exists per (chat, user); storing a new one
/// supersedes any previous entry for the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingState {
    pub chat_id: i64,
    pub user_id: i64,
    /// Canonical name of the command that owns the continuation.
    pub command: String,
    /// Opaque continuation payload, interpreted only by the owning handler.
    pub payload: String,
    /// Set by the owning handler when the flow completed; a finished entry
    /// is ignored by resolution.
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

impl WaitingState {
    pub fn new(
        chat_id: i64,
        user_id: i64,
        command: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            user_id,
            command: command.into(),
            payload: payload.into(),
            finished: false,
            created_at: Utc::now(),
        }
    }
}
