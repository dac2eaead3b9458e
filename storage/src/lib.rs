//! Storage crate: repository abstractions for aliases, waiting states,
//! disabled commands, and access levels.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Alias, WaitingState
//! - [`repository`] – Repository traits consumed by the pipeline
//! - [`memory_repo`] – In-memory implementations

mod error;
mod memory_repo;
mod models;
mod repository;


pub use error::StorageError;
pub use memory_repo::{
    InMemoryAccessRepository, InMemoryAliasRepository, InMemoryDisabledCommandRepository,
    InMemoryWaitingStateRepository,
};
pub use models::{validate_alias_name, Alias, WaitingState};
pub use repository::{
    AccessRepository, AliasRepository, DisabledCommandRepository, WaitingStateRepository,
};
