//! Access control: effective level resolution, command authorization, and
//! the per-chat disabled-command check.

use std::sync::Arc;

use cbot_core::{AccessLevel, Chat, CommandDescriptor, User};
use storage::{AccessRepository, DisabledCommandRepository, StorageError};

pub struct AccessController {
    access: Arc<dyn AccessRepository>,
    disabled: Arc<dyn DisabledCommandRepository>,
}

impl AccessController {
    pub fn new(
        access: Arc<dyn AccessRepository>,
        disabled: Arc<dyn DisabledCommandRepository>,
    ) -> Self {
        Self { access, disabled }
    }

    /// A user's effective level for a chat: the maximum of the global level
    /// and any chat grant. A global `Banned` is terminal and cannot be
    /// lifted by a chat grant.
    pub async fn effective_level(
        &self,
        chat: &Chat,
        user: &User,
    ) -> Result<AccessLevel, StorageError> {
        let global = self.access.global_level(user.id).await?;
        if global == AccessLevel::Banned {
            return Ok(AccessLevel::Banned);
        }
        let chat_grant = self.access.chat_level(chat.id, user.id).await?;
        Ok(chat_grant.map_or(global, |grant| global.max(grant)))
    }

    /// True iff the effective level reaches the command's minimum.
    pub fn authorize(level: AccessLevel, command: &CommandDescriptor) -> bool {
        level >= command.min_level
    }

    /// Whether the command is administratively disabled in this chat. The
    /// settings command is never considered disabled, whatever is stored;
    /// enforcing that here instead of at storage time prevents lockout.
    pub async fn is_disabled(
        &self,
        chat: &Chat,
        command: &CommandDescriptor,
    ) -> Result<bool, StorageError> {
        if command.settings {
            return Ok(false);
        }
        self.disabled.is_disabled(chat.id, &command.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{InMemoryAccessRepository, InMemoryDisabledCommandRepository};

    fn controller() -> (Arc<InMemoryAccessRepository>, Arc<InMemoryDisabledCommandRepository>, AccessController)
    {
        let access = Arc::new(InMemoryAccessRepository::new());
        let disabled = Arc::new(InMemoryDisabledCommandRepository::new());
        let controller = AccessController::new(access.clone(), disabled.clone());
        (access, disabled, controller)
    }

    #[tokio::test]
    async fn test_effective_level_takes_maximum() {
        let (access, _, controller) = controller();
        access.set_global(2, AccessLevel::Newcomer);
        access.set_chat(-10, 2, AccessLevel::Trusted);

        let level = controller
            .effective_level(&Chat::new(-10), &User::new(2, "tester"))
            .await
            .expect("Failed to resolve level");
        assert_eq!(level, AccessLevel::Trusted);
    }

    #[tokio::test]
    async fn test_global_ban_is_terminal() {
        let (access, _, controller) = controller();
        access.set_global(2, AccessLevel::Banned);
        access.set_chat(-10, 2, AccessLevel::Admin);

        let level = controller
            .effective_level(&Chat::new(-10), &User::new(2, "tester"))
            .await
            .expect("Failed to resolve level");
        assert_eq!(level, AccessLevel::Banned);
    }

    #[test]
    fn test_authorize_over_full_range() {
        let command = CommandDescriptor::new("weather", "weather", AccessLevel::Trusted);
        for level in AccessLevel::ALL {
            assert_eq!(
                AccessController::authorize(level, &command),
                level >= AccessLevel::Trusted
            );
        }
    }

    #[tokio::test]
    async fn test_settings_command_never_disabled() {
        let (_, disabled, controller) = controller();
        disabled
            .set_disabled(-10, "set", true)
            .await
            .expect("Failed to disable");

        let settings =
            CommandDescriptor::new("set", "set", AccessLevel::Moderator).as_settings();
        let is_disabled = controller
            .is_disabled(&Chat::new(-10), &settings)
            .await
            .expect("Failed to query");
        assert!(!is_disabled);
    }

    #[tokio::test]
    async fn test_regular_command_disable_honored() {
        let (_, disabled, controller) = controller();
        disabled
            .set_disabled(-10, "weather", true)
            .await
            .expect("Failed to disable");

        let weather = CommandDescriptor::new("weather", "weather", AccessLevel::Newcomer);
        assert!(controller
            .is_disabled(&Chat::new(-10), &weather)
            .await
            .expect("Failed to query"));
        assert!(!controller
            .is_disabled(&Chat::new(-11), &weather)
            .await
            .expect("Failed to query"));
    }
}
