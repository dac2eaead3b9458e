//! Repository traits backing the pipeline. Storage-agnostic: the pipeline
//! only sees these interfaces, never an engine.

use async_trait::async_trait;
use cbot_core::AccessLevel;

use crate::error::StorageError;
use crate::models::{Alias, WaitingState};

/// Per-(chat, user) alias rows, matched by name case-insensitively.
#[async_trait]
pub trait AliasRepository: Send + Sync {
    async fn find(
        &self,
        chat_id: i64,
        user_id: i64,
        name: &str,
    ) -> Result<Option<Alias>, StorageError>;
    /// Stores an alias. Implementations must reject names shadowing the
    /// settings command (see [`crate::models::validate_alias_name`]).
    async fn save(&self, alias: &Alias) -> Result<(), StorageError>;
    async fn delete(&self, chat_id: i64, user_id: i64, name: &str)
        -> Result<bool, StorageError>;
    async fn list(&self, chat_id: i64, user_id: i64) -> Result<Vec<Alias>, StorageError>;
}

/// Single-slot waiting state per (chat, user).
#[async_trait]
pub trait WaitingStateRepository: Send + Sync {
    async fn get(&self, chat_id: i64, user_id: i64)
        -> Result<Option<WaitingState>, StorageError>;
    /// Stores the state, superseding any previous entry for the pair.
    async fn put(&self, state: WaitingState) -> Result<(), StorageError>;
    /// Removes the slot. Idempotent: returns false when nothing was there.
    async fn remove(&self, chat_id: i64, user_id: i64) -> Result<bool, StorageError>;
}

/// Per-chat set of administratively disabled command names.
#[async_trait]
pub trait DisabledCommandRepository: Send + Sync {
    async fn is_disabled(&self, chat_id: i64, command: &str) -> Result<bool, StorageError>;
    async fn set_disabled(
        &self,
        chat_id: i64,
        command: &str,
        disabled: bool,
    ) -> Result<(), StorageError>;
    async fn list(&self, chat_id: i64) -> Result<Vec<String>, StorageError>;
}

/// Read side of access levels: a user's global level plus any chat grant.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn global_level(&self, user_id: i64) -> Result<AccessLevel, StorageError>;
    async fn chat_level(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<AccessLevel>, StorageError>;
}
