//! Built-in leaf handlers and the audit analyzer the CLI wires in. Real
//! deployments register their own handlers next to (or instead of) these.

use std::sync::Arc;

use async_trait::async_trait;
use cbot_core::{
    BotResponse, CommandDescriptor, CommandHandler, HandlerFailure, InboundEvent,
    MessageAnalyzer,
};
use storage::DisabledCommandRepository;
use tracing::info;

/// Replies "pong". Useful as a liveness probe.
pub struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    async fn handle(
        &self,
        event: &InboundEvent,
        _args: &str,
        _pending_payload: Option<&str>,
    ) -> Result<Vec<BotResponse>, HandlerFailure> {
        Ok(vec![BotResponse::text(event.chat, "pong")])
    }
}

/// Lists the registered commands with their help lines.
pub struct HelpHandler {
    commands: Vec<CommandDescriptor>,
}

impl HelpHandler {
    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self { commands }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(
        &self,
        event: &InboundEvent,
        _args: &str,
        _pending_payload: Option<&str>,
    ) -> Result<Vec<BotResponse>, HandlerFailure> {
        let mut lines: Vec<String> = self
            .commands
            .iter()
            .map(|command| {
                if command.help.is_empty() {
                    command.name.clone()
                } else {
                    format!("{} - {}", command.name, command.help)
                }
            })
            .collect();
        lines.sort();
        Ok(vec![BotResponse::text(event.chat, lines.join("\n"))])
    }
}

/// The administration command: enable/disable commands per chat.
pub struct SettingsHandler {
    disabled: Arc<dyn DisabledCommandRepository>,
    known_commands: Vec<String>,
}

impl SettingsHandler {
    pub fn new(
        disabled: Arc<dyn DisabledCommandRepository>,
        known_commands: Vec<String>,
    ) -> Self {
        Self {
            disabled,
            known_commands,
        }
    }

    fn known(&self, name: &str) -> Result<(), HandlerFailure> {
        if self.known_commands.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            Ok(())
        } else {
            Err(HandlerFailure::user(format!("unknown command: {}", name)))
        }
    }
}

#[async_trait]
impl CommandHandler for SettingsHandler {
    async fn handle(
        &self,
        event: &InboundEvent,
        args: &str,
        _pending_payload: Option<&str>,
    ) -> Result<Vec<BotResponse>, HandlerFailure> {
        let mut parts = args.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("disable"), Some(name)) => {
                self.known(name)?;
                self.disabled
                    .set_disabled(event.chat.id, name, true)
                    .await
                    .map_err(|e| HandlerFailure::Internal(e.into()))?;
                Ok(vec![BotResponse::text(
                    event.chat,
                    format!("{} disabled in this chat", name),
                )])
            }
            (Some("enable"), Some(name)) => {
                self.known(name)?;
                self.disabled
                    .set_disabled(event.chat.id, name, false)
                    .await
                    .map_err(|e| HandlerFailure::Internal(e.into()))?;
                Ok(vec![BotResponse::text(
                    event.chat,
                    format!("{} enabled in this chat", name),
                )])
            }
            (Some("list"), None) => {
                let disabled = self
                    .disabled
                    .list(event.chat.id)
                    .await
                    .map_err(|e| HandlerFailure::Internal(e.into()))?;
                let text = if disabled.is_empty() {
                    "no commands disabled in this chat".to_string()
                } else {
                    format!("disabled here: {}", disabled.join(", "))
                };
                Ok(vec![BotResponse::text(event.chat, text)])
            }
            _ => Err(HandlerFailure::user(
                "usage: set disable <command> | set enable <command> | set list",
            )),
        }
    }
}

/// Logs every observed event; stands in for richer passive analyzers such
/// as statistics collectors or the ambient chit-chat responder.
pub struct AuditAnalyzer;

#[async_trait]
impl MessageAnalyzer for AuditAnalyzer {
    async fn analyze(&self, event: &InboundEvent) -> anyhow::Result<()> {
        info!(
            chat_id = event.chat.id,
            user_id = event.user.id,
            user = %event.user.display_name,
            is_callback = event.is_callback,
            text_len = event.text.len(),
            "Event observed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbot_core::{Chat, User};
    use storage::InMemoryDisabledCommandRepository;

    fn event(args_holder_text: &str) -> InboundEvent {
        InboundEvent {
            chat: Chat::new(-10),
            user: User::new(1, "tester"),
            text: args_holder_text.to_string(),
            is_callback: false,
            message_id: 1,
        }
    }

    #[tokio::test]
    async fn test_settings_disable_and_list() {
        let repo = Arc::new(InMemoryDisabledCommandRepository::new());
        let handler = SettingsHandler::new(repo.clone(), vec!["ping".to_string()]);

        handler
            .handle(&event("set disable ping"), "disable ping", None)
            .await
            .expect("disable should succeed");
        assert!(repo.is_disabled(-10, "ping").await.expect("query failed"));

        let responses = handler
            .handle(&event("set list"), "list", None)
            .await
            .expect("list should succeed");
        match &responses[0] {
            BotResponse::Text(text) => assert!(text.text.contains("ping")),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_settings_unknown_command_is_user_facing() {
        let repo = Arc::new(InMemoryDisabledCommandRepository::new());
        let handler = SettingsHandler::new(repo, vec!["ping".to_string()]);

        let result = handler
            .handle(&event("set disable nope"), "disable nope", None)
            .await;
        assert!(matches!(result, Err(HandlerFailure::UserFacing(_))));
    }

    #[tokio::test]
    async fn test_help_lists_commands_with_help_lines() {
        use cbot_core::AccessLevel;

        let handler = HelpHandler::new(vec![
            CommandDescriptor::new("ping", "ping", AccessLevel::Newcomer)
                .with_help("liveness check"),
            CommandDescriptor::new("bare", "bare", AccessLevel::Newcomer),
        ]);

        let responses = handler
            .handle(&event("help"), "", None)
            .await
            .expect("help should succeed");
        match &responses[0] {
            BotResponse::Text(text) => {
                assert_eq!(text.text, "bare\nping - liveness check");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ping_replies_pong() {
        let responses = PingHandler
            .handle(&event("ping"), "", None)
            .await
            .expect("ping should succeed");
        match &responses[0] {
            BotResponse::Text(text) => assert_eq!(text.text, "pong"),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
