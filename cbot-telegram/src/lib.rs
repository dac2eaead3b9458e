//! # cbot-telegram
//!
//! Telegram transport layer: adapters from teloxide updates to core raw
//! updates, output senders for every response kind, minimal env config,
//! and the polling runner. Handles only Telegram connectivity; all
//! resolution and execution logic lives in `dispatch`.

mod adapters;
mod config;
mod runner;
mod senders;

pub use adapters::{to_core_user, to_raw_update};
pub use config::TelegramConfig;
pub use runner::run_polling;
pub use senders::{
    TelegramDocumentGroupSender, TelegramDocumentSender, TelegramKeyboardEditSender,
    TelegramLocationSender, TelegramTextSender,
};
