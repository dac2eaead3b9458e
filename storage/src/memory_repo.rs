//! In-memory repository implementations. Each operation takes one mutex, so
//! every read-modify-write is atomic; concurrent events from the same
//! (chat, user) pair get last-write-wins semantics on the waiting slot.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use cbot_core::AccessLevel;
use tracing::debug;

use crate::error::StorageError;
use crate::models::{validate_alias_name, Alias, WaitingState};
use crate::repository::{
    AccessRepository, AliasRepository, DisabledCommandRepository, WaitingStateRepository,
};

/// Alias rows keyed by (chat, user, lowercased name).
pub struct InMemoryAliasRepository {
    aliases: Mutex<HashMap<(i64, i64, String), Alias>>,
    /// Settings-command name variants an alias may never shadow.
    reserved_names: Vec<String>,
}

impl InMemoryAliasRepository {
    pub fn new(reserved_names: Vec<String>) -> Self {
        Self {
            aliases: Mutex::new(HashMap::new()),
            reserved_names,
        }
    }
}

#[async_trait]
impl AliasRepository for InMemoryAliasRepository {
    async fn find(
        &self,
        chat_id: i64,
        user_id: i64,
        name: &str,
    ) -> Result<Option<Alias>, StorageError> {
        let aliases = self.aliases.lock().map_err(poisoned)?;
        Ok(aliases
            .get(&(chat_id, user_id, name.trim().to_lowercase()))
            .cloned())
    }

    async fn save(&self, alias: &Alias) -> Result<(), StorageError> {
        validate_alias_name(&alias.name, &self.reserved_names)?;
        let mut aliases = self.aliases.lock().map_err(poisoned)?;
        let key = (alias.chat_id, alias.user_id, alias.name.trim().to_lowercase());
        aliases.insert(key, alias.clone());
        Ok(())
    }

    async fn delete(
        &self,
        chat_id: i64,
        user_id: i64,
        name: &str,
    ) -> Result<bool, StorageError> {
        let mut aliases = self.aliases.lock().map_err(poisoned)?;
        Ok(aliases
            .remove(&(chat_id, user_id, name.trim().to_lowercase()))
            .is_some())
    }

    async fn list(&self, chat_id: i64, user_id: i64) -> Result<Vec<Alias>, StorageError> {
        let aliases = self.aliases.lock().map_err(poisoned)?;
        Ok(aliases
            .values()
            .filter(|a| a.chat_id == chat_id && a.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Waiting slots keyed by (chat, user). `put` supersedes, `remove` is a
/// no-op when the slot is already gone.
pub struct InMemoryWaitingStateRepository {
    states: Mutex<HashMap<(i64, i64), WaitingState>>,
}

impl InMemoryWaitingStateRepository {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryWaitingStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WaitingStateRepository for InMemoryWaitingStateRepository {
    async fn get(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<WaitingState>, StorageError> {
        let states = self.states.lock().map_err(poisoned)?;
        Ok(states.get(&(chat_id, user_id)).cloned())
    }

    async fn put(&self, state: WaitingState) -> Result<(), StorageError> {
        let mut states = self.states.lock().map_err(poisoned)?;
        let previous = states.insert((state.chat_id, state.user_id), state);
        if let Some(previous) = previous {
            debug!(
                chat_id = previous.chat_id,
                user_id = previous.user_id,
                command = %previous.command,
                "Superseded waiting state"
            );
        }
        Ok(())
    }

    async fn remove(&self, chat_id: i64, user_id: i64) -> Result<bool, StorageError> {
        let mut states = self.states.lock().map_err(poisoned)?;
        Ok(states.remove(&(chat_id, user_id)).is_some())
    }
}

/// Disabled command names per chat.
pub struct InMemoryDisabledCommandRepository {
    disabled: Mutex<HashMap<i64, HashSet<String>>>,
}

impl InMemoryDisabledCommandRepository {
    pub fn new() -> Self {
        Self {
            disabled: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDisabledCommandRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DisabledCommandRepository for InMemoryDisabledCommandRepository {
    async fn is_disabled(&self, chat_id: i64, command: &str) -> Result<bool, StorageError> {
        let disabled = self.disabled.lock().map_err(poisoned)?;
        Ok(disabled
            .get(&chat_id)
            .map(|set| set.contains(&command.to_lowercase()))
            .unwrap_or(false))
    }

    async fn set_disabled(
        &self,
        chat_id: i64,
        command: &str,
        value: bool,
    ) -> Result<(), StorageError> {
        let mut disabled = self.disabled.lock().map_err(poisoned)?;
        let set = disabled.entry(chat_id).or_default();
        if value {
            set.insert(command.to_lowercase());
        } else {
            set.remove(&command.to_lowercase());
        }
        Ok(())
    }

    async fn list(&self, chat_id: i64) -> Result<Vec<String>, StorageError> {
        let disabled = self.disabled.lock().map_err(poisoned)?;
        let mut names: Vec<String> = disabled
            .get(&chat_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }
}

/// Access levels with setters for wiring and tests. Unknown users default
/// to `Newcomer`.
pub struct InMemoryAccessRepository {
    global: Mutex<HashMap<i64, AccessLevel>>,
    per_chat: Mutex<HashMap<(i64, i64), AccessLevel>>,
}

impl InMemoryAccessRepository {
    pub fn new() -> Self {
        Self {
            global: Mutex::new(HashMap::new()),
            per_chat: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_global(&self, user_id: i64, level: AccessLevel) {
        if let Ok(mut global) = self.global.lock() {
            global.insert(user_id, level);
        }
    }

    pub fn set_chat(&self, chat_id: i64, user_id: i64, level: AccessLevel) {
        if let Ok(mut per_chat) = self.per_chat.lock() {
            per_chat.insert((chat_id, user_id), level);
        }
    }
}

impl Default for InMemoryAccessRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn global_level(&self, user_id: i64) -> Result<AccessLevel, StorageError> {
        let global = self.global.lock().map_err(poisoned)?;
        Ok(global
            .get(&user_id)
            .copied()
            .unwrap_or(AccessLevel::Newcomer))
    }

    async fn chat_level(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<AccessLevel>, StorageError> {
        let per_chat = self.per_chat.lock().map_err(poisoned)?;
        Ok(per_chat.get(&(chat_id, user_id)).copied())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Database("mutex poisoned".to_string())
}
