//! Long-poll ingestion loop: fetches updates one batch at a time, adapts
//! and normalizes each, and feeds the dispatcher. Strictly sequential per
//! source; command execution itself runs on the dispatcher's spawned tasks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dispatch::{normalize, Dispatcher};
use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use tracing::{debug, error, info, instrument};

use crate::adapters::to_raw_update;

const POLL_TIMEOUT_SECS: u32 = 30;
const RETRY_DELAY_SECS: u64 = 5;

/// Runs the polling loop until the process is stopped. Transport errors are
/// logged and retried after a short delay; they never abort ingestion.
#[instrument(skip(bot, dispatcher))]
pub async fn run_polling(bot: Bot, dispatcher: Arc<Dispatcher>) -> Result<()> {
    info!("Polling started");
    let mut offset: i32 = 0;
    loop {
        let updates = bot
            .get_updates()
            .offset(offset)
            .timeout(POLL_TIMEOUT_SECS)
            .allowed_updates(vec![
                AllowedUpdate::Message,
                AllowedUpdate::EditedMessage,
                AllowedUpdate::CallbackQuery,
            ])
            .await;

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                error!(error = %e, "get_updates failed, retrying");
                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                continue;
            }
        };

        for update in updates {
            offset = update.id.as_offset();
            let Some(raw) = to_raw_update(update) else {
                continue;
            };
            let Some(event) = normalize(raw) else {
                continue;
            };
            debug!(
                chat_id = event.chat.id,
                user_id = event.user.id,
                is_callback = event.is_callback,
                "Event ingested"
            );
            // The returned join handle is intentionally dropped: the
            // ingestion loop never waits for handler completion.
            let _ = dispatcher.dispatch(event).await;
        }
    }
}
