//! Command execution off the ingestion path: looks up the registered
//! handler, runs it, and translates failures. User-facing failures become a
//! reply quoting the message; internal failures are logged and counted,
//! never shown.

use std::collections::HashMap;
use std::sync::Arc;

use cbot_core::{
    BotResponse, CommandDescriptor, HandlerFailure, CommandHandler, InboundEvent, StatsSink,
};
use tracing::{debug, error, instrument};

use crate::router::ResponseRouter;

/// Holds the explicit registration map from handler key to handler
/// instance; no runtime reflection, built once at startup.
pub struct CommandExecutor {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    router: ResponseRouter,
    stats: Arc<dyn StatsSink>,
}

impl CommandExecutor {
    pub fn new(router: ResponseRouter, stats: Arc<dyn StatsSink>) -> Self {
        Self {
            handlers: HashMap::new(),
            router,
            stats,
        }
    }

    /// Registers a handler under the key command descriptors refer to.
    pub fn register(mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(key.into(), handler);
        self
    }

    /// Runs one handler invocation to completion. Each invocation runs on
    /// its own spawned task, so a failure here never affects another
    /// in-flight event.
    #[instrument(skip(self, event, args, pending_payload), fields(command = %descriptor.name, chat_id = event.chat.id, user_id = event.user.id))]
    pub async fn execute(
        &self,
        descriptor: Arc<CommandDescriptor>,
        event: InboundEvent,
        args: String,
        pending_payload: Option<String>,
    ) {
        let handler = match self.handlers.get(&descriptor.handler) {
            Some(handler) => handler,
            None => {
                error!(
                    handler = %descriptor.handler,
                    "No handler registered for command"
                );
                self.stats.increment_error(
                    &format!("execute {}", descriptor.name),
                    "handler not registered",
                    "check executor registration map",
                );
                return;
            }
        };

        match handler.handle(&event, &args, pending_payload.as_deref()).await {
            Ok(responses) => {
                debug!(responses = responses.len(), "Handler succeeded");
                self.router.route(&responses).await;
                self.stats.increment_processed();
            }
            Err(HandlerFailure::UserFacing(message)) => {
                debug!(message = %message, "Handler signalled a user-facing failure");
                let reply = BotResponse::reply(event.chat, event.message_id, message);
                self.router.route(&[reply]).await;
            }
            Err(HandlerFailure::Internal(cause)) => {
                error!(
                    event = ?event,
                    cause = %cause,
                    "Handler failed unexpectedly, nothing sent to the user"
                );
                self.stats.increment_error(
                    &format!(
                        "execute {} (chat {}, user {})",
                        descriptor.name, event.chat.id, event.user.id
                    ),
                    &cause.to_string(),
                    "unexpected handler failure",
                );
            }
        }
    }
}
