//! # cbot-core
//!
//! Shared types and traits for the bot message pipeline: inbound event and
//! response shapes, command descriptors, the [`CommandHandler`] /
//! [`MessageAnalyzer`] / [`ResponseSender`] / [`StatsSink`] traits, error
//! types, and tracing initialization. Transport-agnostic; used by `dispatch`
//! and `cbot-telegram`.

pub mod error;
pub mod logger;
pub mod response;
pub mod types;

pub use error::{CbotError, HandlerFailure, Result};
pub use logger::init_tracing;
pub use response::{
    BotResponse, DocumentResponse, KeyboardButton, KeyboardEditResponse, LocationResponse,
    ResponseKind, ResponseSender, TextResponse,
};
pub use types::{
    AccessLevel, Chat, CommandDescriptor, CommandHandler, InboundEvent, MessageAnalyzer,
    RawCallback, RawMessage, RawUpdate, StatsSink, User,
};
