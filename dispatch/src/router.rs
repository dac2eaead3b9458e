//! Response routing: matches each typed handler response to the output
//! sender declared for its kind. Unroutable responses and sender failures
//! are contained per item; siblings in the batch are still delivered.

use std::collections::HashMap;
use std::sync::Arc;

use cbot_core::{BotResponse, ResponseKind, ResponseSender, StatsSink};
use tracing::{debug, error};

pub struct ResponseRouter {
    senders: HashMap<ResponseKind, Arc<dyn ResponseSender>>,
    stats: Arc<dyn StatsSink>,
}

impl ResponseRouter {
    pub fn new(stats: Arc<dyn StatsSink>) -> Self {
        Self {
            senders: HashMap::new(),
            stats,
        }
    }

    /// Registers a sender for every kind it declares. A later registration
    /// for an already-covered kind replaces the earlier one.
    pub fn register(mut self, sender: Arc<dyn ResponseSender>) -> Self {
        for kind in sender.kinds() {
            self.senders.insert(*kind, sender.clone());
        }
        self
    }

    /// Delivers a batch of responses. Returns how many were delivered.
    pub async fn route(&self, responses: &[BotResponse]) -> usize {
        let mut delivered = 0;
        for response in responses {
            if self.route_one(response).await {
                delivered += 1;
            }
        }
        delivered
    }

    async fn route_one(&self, response: &BotResponse) -> bool {
        let kind = response.kind();
        if let Some(sender) = self.senders.get(&kind) {
            return self.send_with(sender, response).await;
        }

        // A bundle of documents prefers the group sender; with only the
        // single-document sender registered, fall back to item-by-item.
        if let BotResponse::DocumentGroup(documents) = response {
            if let Some(sender) = self.senders.get(&ResponseKind::Document) {
                debug!(
                    count = documents.len(),
                    "No group sender registered, sending documents one by one"
                );
                let mut all_sent = !documents.is_empty();
                for document in documents {
                    let single = BotResponse::Document(document.clone());
                    if !self.send_with(sender, &single).await {
                        all_sent = false;
                    }
                }
                return all_sent;
            }
        }

        error!(kind = %kind, "Missing sender for response kind, dropping response");
        self.stats.increment_error(
            &format!("route {}", kind),
            "no sender registered",
            "response dropped",
        );
        false
    }

    async fn send_with(&self, sender: &Arc<dyn ResponseSender>, response: &BotResponse) -> bool {
        match sender.send(response).await {
            Ok(()) => true,
            Err(e) => {
                error!(kind = %response.kind(), error = %e, "Sender failed, dropping response");
                self.stats.increment_error(
                    &format!("route {}", response.kind()),
                    &e.to_string(),
                    "sender failure",
                );
                false
            }
        }
    }
}
