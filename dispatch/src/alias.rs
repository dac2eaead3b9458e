//! Alias resolution: one level of per-(chat, user) shortcut expansion,
//! applied before waiting-state and registry lookups.

use std::sync::Arc;

use cbot_core::{Chat, User};
use storage::AliasRepository;
use tracing::{debug, warn};

pub struct AliasResolver {
    repo: Arc<dyn AliasRepository>,
}

impl AliasResolver {
    pub fn new(repo: Arc<dyn AliasRepository>) -> Self {
        Self { repo }
    }

    /// Returns the stored expansion when the whole input text equals an
    /// alias name for this (chat, user), otherwise the input unchanged.
    /// Exactly one level: an alias expanding to another alias name is not
    /// expanded again, so loops cannot form.
    pub async fn resolve(&self, chat: &Chat, user: &User, text: &str) -> String {
        match self.repo.find(chat.id, user.id, text).await {
            Ok(Some(alias)) => {
                debug!(
                    chat_id = chat.id,
                    user_id = user.id,
                    alias = %alias.name,
                    "Expanded alias"
                );
                alias.expansion
            }
            Ok(None) => text.to_string(),
            Err(e) => {
                warn!(
                    chat_id = chat.id,
                    user_id = user.id,
                    error = %e,
                    "Alias lookup failed, using raw text"
                );
                text.to_string()
            }
        }
    }
}
