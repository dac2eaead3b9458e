//! In-memory statistics sink: atomic totals plus per-command and per-user
//! counts, safe to call from concurrent executor tasks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use cbot_core::{Chat, StatsSink, User};
use tracing::{debug, error};

pub struct InMemoryStats {
    received: AtomicU64,
    processed: AtomicU64,
    errors: AtomicU64,
    per_command: Mutex<HashMap<String, u64>>,
    per_user: Mutex<HashMap<i64, u64>>,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self {
            received: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            per_command: Mutex::new(HashMap::new()),
            per_user: Mutex::new(HashMap::new()),
        }
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::SeqCst)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    pub fn command_count(&self, command: &str) -> u64 {
        self.per_command
            .lock()
            .map(|counts| counts.get(command).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn user_count(&self, user_id: i64) -> u64 {
        self.per_user
            .lock()
            .map(|counts| counts.get(&user_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Default for InMemoryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSink for InMemoryStats {
    fn increment_received(&self) {
        self.received.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_command(&self, chat: &Chat, user: &User, command: &str) {
        if let Ok(mut counts) = self.per_command.lock() {
            *counts.entry(command.to_string()).or_insert(0) += 1;
        }
        if let Ok(mut counts) = self.per_user.lock() {
            *counts.entry(user.id).or_insert(0) += 1;
        }
        debug!(
            chat_id = chat.id,
            user_id = user.id,
            user = %user.display_name,
            command = %command,
            "Command dispatched"
        );
    }

    fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_error(&self, context: &str, cause: &str, note: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        error!(context = %context, cause = %cause, note = %note, "Pipeline error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let stats = InMemoryStats::new();
        let chat = Chat::new(1);
        let user = User::new(2, "tester");

        stats.increment_received();
        stats.increment_command(&chat, &user, "weather");
        stats.increment_command(&chat, &user, "weather");
        stats.increment_processed();
        stats.increment_error("ctx", "boom", "note");

        assert_eq!(stats.received(), 1);
        assert_eq!(stats.command_count("weather"), 2);
        assert_eq!(stats.user_count(2), 2);
        assert_eq!(stats.processed(), 1);
        assert_eq!(stats.errors(), 1);
    }
}
