//! Integration tests for [`dispatch::ResponseRouter`].
//!
//! Covers sender selection by kind, the document-group preference and its
//! per-item fallback, missing-sender drops with sibling delivery, and
//! sender failure containment.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cbot_core::{
    BotResponse, CbotError, Chat, DocumentResponse, ResponseKind, ResponseSender,
};
use dispatch::{InMemoryStats, ResponseRouter};

struct RecordingSender {
    kinds: Vec<ResponseKind>,
    sent: Arc<Mutex<Vec<BotResponse>>>,
    fail: bool,
}

#[async_trait]
impl ResponseSender for RecordingSender {
    fn kinds(&self) -> &[ResponseKind] {
        &self.kinds
    }

    async fn send(&self, response: &BotResponse) -> cbot_core::Result<()> {
        if self.fail {
            return Err(CbotError::Sender("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(response.clone());
        Ok(())
    }
}

fn sender(
    kinds: Vec<ResponseKind>,
    sent: &Arc<Mutex<Vec<BotResponse>>>,
) -> Arc<RecordingSender> {
    Arc::new(RecordingSender {
        kinds,
        sent: sent.clone(),
        fail: false,
    })
}

fn document(name: &str) -> DocumentResponse {
    DocumentResponse {
        chat: Chat::new(1),
        file_name: name.to_string(),
        bytes: vec![1, 2, 3],
        caption: None,
    }
}

/// **Test: a document bundle goes to the group sender when one exists.**
#[tokio::test]
async fn test_group_sender_preferred() {
    let stats = Arc::new(InMemoryStats::new());
    let group_sent = Arc::new(Mutex::new(Vec::new()));
    let single_sent = Arc::new(Mutex::new(Vec::new()));
    let router = ResponseRouter::new(stats)
        .register(sender(vec![ResponseKind::Document], &single_sent))
        .register(sender(vec![ResponseKind::DocumentGroup], &group_sent));

    let batch = [BotResponse::DocumentGroup(vec![
        document("a.txt"),
        document("b.txt"),
    ])];
    let delivered = router.route(&batch).await;

    assert_eq!(delivered, 1);
    assert_eq!(group_sent.lock().unwrap().len(), 1);
    assert!(single_sent.lock().unwrap().is_empty());
}

/// **Test: without a group sender the bundle falls back to item-by-item
/// delivery through the single-document sender.**
#[tokio::test]
async fn test_group_falls_back_to_single_sender() {
    let stats = Arc::new(InMemoryStats::new());
    let single_sent = Arc::new(Mutex::new(Vec::new()));
    let router = ResponseRouter::new(stats.clone())
        .register(sender(vec![ResponseKind::Document], &single_sent));

    let batch = [BotResponse::DocumentGroup(vec![
        document("a.txt"),
        document("b.txt"),
    ])];
    let delivered = router.route(&batch).await;

    assert_eq!(delivered, 1);
    assert_eq!(single_sent.lock().unwrap().len(), 2);
    assert_eq!(stats.errors(), 0);
}

/// **Test: a response with no matching sender is dropped and logged;
/// siblings in the batch are still delivered.**
#[tokio::test]
async fn test_missing_sender_drops_single_response() {
    let stats = Arc::new(InMemoryStats::new());
    let text_sent = Arc::new(Mutex::new(Vec::new()));
    let router =
        ResponseRouter::new(stats.clone()).register(sender(vec![ResponseKind::Text], &text_sent));

    let batch = [
        BotResponse::text(Chat::new(1), "first"),
        BotResponse::Document(document("a.txt")),
        BotResponse::text(Chat::new(1), "last"),
    ];
    let delivered = router.route(&batch).await;

    assert_eq!(delivered, 2);
    assert_eq!(text_sent.lock().unwrap().len(), 2);
    assert_eq!(stats.errors(), 1);
}

/// **Test: a failing sender does not abort the rest of the batch.**
#[tokio::test]
async fn test_sender_failure_contained() {
    let stats = Arc::new(InMemoryStats::new());
    let text_sent = Arc::new(Mutex::new(Vec::new()));
    let failing = Arc::new(RecordingSender {
        kinds: vec![ResponseKind::Document],
        sent: Arc::new(Mutex::new(Vec::new())),
        fail: true,
    });
    let router = ResponseRouter::new(stats.clone())
        .register(sender(vec![ResponseKind::Text], &text_sent))
        .register(failing);

    let batch = [
        BotResponse::Document(document("a.txt")),
        BotResponse::text(Chat::new(1), "still here"),
    ];
    let delivered = router.route(&batch).await;

    assert_eq!(delivered, 1);
    assert_eq!(text_sent.lock().unwrap().len(), 1);
    assert_eq!(stats.errors(), 1);
}
