//! # dispatch
//!
//! The bot message pipeline: event normalization, abuse/staleness filtering,
//! stateful command resolution (waiting states and aliases), per-command
//! authorization, isolated asynchronous execution with structured error
//! translation, and response-type dispatch to output senders.
//!
//! ## Modules
//!
//! - [`normalizer`] – raw update → [`cbot_core::InboundEvent`]
//! - [`registry`] – command name lookup (exact and longest prefix)
//! - [`alias`] – one-level per-(chat, user) shortcut expansion
//! - [`access`] – effective level, authorization, disabled commands
//! - [`dispatcher`] – the orchestrator
//! - [`executor`] – isolated handler execution and failure translation
//! - [`router`] – typed response → output sender dispatch
//! - [`stats`] – in-memory counters

pub mod access;
pub mod alias;
pub mod dispatcher;
pub mod executor;
pub mod normalizer;
pub mod registry;
pub mod router;
pub mod stats;

pub use access::AccessController;
pub use alias::AliasResolver;
pub use dispatcher::Dispatcher;
pub use executor::CommandExecutor;
pub use normalizer::{normalize, stale_edit_threshold};
pub use registry::{CommandRegistry, Resolved};
pub use router::ResponseRouter;
pub use stats::InMemoryStats;
