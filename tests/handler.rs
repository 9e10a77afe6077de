//! Handler behavior at the chat boundary.

mod fixtures;

use fixtures::{MemoryStore, RecordingTransport};
use tallybot::bot::transport::{Inbound, OperatorId};
use tallybot::bot::Handler;
use tallybot::reconcile::Reconciler;

const ADMIN: OperatorId = OperatorId(1);

fn handler(store: &MemoryStore) -> Handler<&MemoryStore> {
    Handler::new(Reconciler::new(store, "data.json", 3), vec![ADMIN])
}

fn inbound(sender: OperatorId, text: &str) -> Inbound {
    Inbound {
        sender,
        chat_id: 42,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn unknown_senders_get_silence() {
    let store = MemoryStore::empty();
    let transport = RecordingTransport::new();
    handler(&store)
        .handle(&transport, &inbound(OperatorId(2), "500"))
        .await
        .unwrap();
    assert!(transport.is_silent());
    assert_eq!(store.fetches(), 0);
}

#[tokio::test]
async fn malformed_input_reprompts_without_touching_the_store() {
    let store = MemoryStore::empty();
    let transport = RecordingTransport::new();
    let h = handler(&store);
    for bad in ["abc", "19/01 500"] {
        h.handle(&transport, &inbound(ADMIN, bad)).await.unwrap();
    }
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("19.01 500"), "prompt shows the format");
    assert_eq!(store.fetches(), 0);
    assert_eq!(store.put_attempts(), 0);
}

#[tokio::test]
async fn start_command_greets() {
    let store = MemoryStore::empty();
    let transport = RecordingTransport::new();
    handler(&store)
        .handle(&transport, &inbound(ADMIN, "/start"))
        .await
        .unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.starts_with("Bot ready"));
    assert!(transport.edits().is_empty());
}

#[tokio::test]
async fn delta_replies_with_progress_then_edits_in_result() {
    let store = MemoryStore::empty();
    let transport = RecordingTransport::new();
    handler(&store)
        .handle(&transport, &inbound(ADMIN, "500"))
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 42);
    assert!(sent[0].1.starts_with("Updating"));

    let edits = transport.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, "Recorded +500. Total collected: 500.");
    assert_eq!(store.ledger().unwrap().collected, 500);
}

#[tokio::test]
async fn absolute_replies_with_date_and_total() {
    let store = MemoryStore::empty();
    let transport = RecordingTransport::new();
    handler(&store)
        .handle(&transport, &inbound(ADMIN, "19.01 300"))
        .await
        .unwrap();

    let edits = transport.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, "Recorded 300 for 19.01. Total collected: 300.");
}

#[tokio::test]
async fn store_failure_text_reaches_the_operator() {
    let store = MemoryStore::empty();
    store.fail_gets_with(502);
    let transport = RecordingTransport::new();
    handler(&store)
        .handle(&transport, &inbound(ADMIN, "500"))
        .await
        .unwrap();

    let edits = transport.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, "Update failed: GitHub (GET) error: 502");
}
