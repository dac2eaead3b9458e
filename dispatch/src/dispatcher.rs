//! The orchestrator: per inbound event, resolves access, runs the passive
//! analyzers, resolves the command (alias → waiting state → registry),
//! authorizes it, records usage, and hands off to the executor on a spawned
//! task so the ingestion loop never blocks on handler completion.

use std::sync::Arc;

use cbot_core::{AccessLevel, CommandDescriptor, InboundEvent, MessageAnalyzer, StatsSink};
use storage::WaitingStateRepository;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::access::AccessController;
use crate::alias::AliasResolver;
use crate::executor::CommandExecutor;
use crate::registry::CommandRegistry;

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    aliases: AliasResolver,
    waiting: Arc<dyn WaitingStateRepository>,
    access: AccessController,
    analyzers: Vec<Arc<dyn MessageAnalyzer>>,
    executor: Arc<CommandExecutor>,
    stats: Arc<dyn StatsSink>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        aliases: AliasResolver,
        waiting: Arc<dyn WaitingStateRepository>,
        access: AccessController,
        executor: Arc<CommandExecutor>,
        stats: Arc<dyn StatsSink>,
    ) -> Self {
        Self {
            registry,
            aliases,
            waiting,
            access,
            analyzers: Vec::new(),
            executor,
            stats,
        }
    }

    /// Appends a passive analyzer. Analyzers observe every non-banned event
    /// in arrival order; their failures are contained per analyzer.
    pub fn add_analyzer(mut self, analyzer: Arc<dyn MessageAnalyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    /// Processes one event. Returns the join handle of the spawned handler
    /// task when a command was dispatched; the ingestion loop drops it,
    /// tests await it.
    #[instrument(skip(self, event), fields(chat_id = event.chat.id, user_id = event.user.id))]
    pub async fn dispatch(&self, event: InboundEvent) -> Option<JoinHandle<()>> {
        let level = match self.access.effective_level(&event.chat, &event.user).await {
            Ok(level) => level,
            Err(e) => {
                self.stats.increment_error(
                    &format!("access (chat {}, user {})", event.chat.id, event.user.id),
                    &e.to_string(),
                    "access lookup failed, event dropped",
                );
                return None;
            }
        };
        if level == AccessLevel::Banned {
            debug!("Banned user, event dropped");
            return None;
        }

        self.stats.increment_received();

        for analyzer in &self.analyzers {
            if let Err(e) = analyzer.analyze(&event).await {
                self.stats.increment_error(
                    &format!("analyze (chat {}, user {})", event.chat.id, event.user.id),
                    &e.to_string(),
                    "analyzer failure contained",
                );
            }
        }

        let (descriptor, args, payload) = match self.resolve(&event).await {
            Some(resolution) => resolution,
            None => return None,
        };

        match self.access.is_disabled(&event.chat, &descriptor).await {
            Ok(false) => {}
            Ok(true) => {
                // Observationally identical to an unknown command.
                debug!(command = %descriptor.name, "Command disabled in chat, event dropped");
                return None;
            }
            Err(e) => {
                self.stats.increment_error(
                    &format!("disabled lookup ({})", descriptor.name),
                    &e.to_string(),
                    "event dropped",
                );
                return None;
            }
        }
        if !AccessController::authorize(level, &descriptor) {
            debug!(
                command = %descriptor.name,
                level = ?level,
                "Unauthorized, event dropped"
            );
            return None;
        }

        self.stats
            .increment_command(&event.chat, &event.user, &descriptor.name);

        let executor = self.executor.clone();
        Some(tokio::spawn(async move {
            executor.execute(descriptor, event, args, payload).await;
        }))
    }

    /// Resolution order: alias expansion (exactly once), then the waiting
    /// slot, then the registry. A live waiting state routes the raw text to
    /// its owning command, unless the text itself invokes a different
    /// recognized command, which supersedes the pending flow.
    async fn resolve(
        &self,
        event: &InboundEvent,
    ) -> Option<(Arc<CommandDescriptor>, String, Option<String>)> {
        let text = self
            .aliases
            .resolve(&event.chat, &event.user, &event.text)
            .await;
        let resolved = self.registry.resolve(&text);

        let pending = match self.waiting.get(event.chat.id, event.user.id).await {
            Ok(Some(pending)) if pending.finished => {
                // Finished entries are dead weight; reap on first sight.
                if let Err(e) = self.waiting.remove(event.chat.id, event.user.id).await {
                    warn!(error = %e, "Failed to clear finished waiting state");
                }
                None
            }
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %e, "Waiting state lookup failed, falling back to registry");
                None
            }
        };

        match (pending, resolved) {
            (Some(pending), Some(resolved))
                if !resolved.descriptor.name.eq_ignore_ascii_case(&pending.command) =>
            {
                // Escape hatch: a new command breaks out of the pending flow.
                if let Err(e) = self.waiting.remove(event.chat.id, event.user.id).await {
                    warn!(error = %e, "Failed to clear superseded waiting state");
                }
                debug!(
                    superseded = %pending.command,
                    command = %resolved.descriptor.name,
                    "Pending flow superseded by new command"
                );
                Some((resolved.descriptor, resolved.args, None))
            }
            (Some(pending), _) => match self.registry.get(&pending.command) {
                Some(descriptor) => Some((descriptor, text, Some(pending.payload))),
                None => {
                    warn!(
                        command = %pending.command,
                        "Waiting state references an unregistered command, clearing it"
                    );
                    if let Err(e) = self.waiting.remove(event.chat.id, event.user.id).await {
                        warn!(error = %e, "Failed to clear orphaned waiting state");
                    }
                    None
                }
            },
            (None, Some(resolved)) => Some((resolved.descriptor, resolved.args, None)),
            (None, None) => {
                // Not every message is a command.
                None
            }
        }
    }
}
