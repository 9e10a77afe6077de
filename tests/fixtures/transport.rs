//! Recording `ChatTransport` fake.

use std::sync::Mutex;

use tallybot::bot::transport::{ChatTransport, MessageRef, TransportError};

#[derive(Default)]
pub struct RecordingTransport {
    next_id: Mutex<i64>,
    sent: Mutex<Vec<(i64, String)>>,
    edits: Mutex<Vec<(MessageRef, String)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(chat_id, text)` of every sent message, in order.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// `(message, text)` of every edit, in order.
    pub fn edits(&self) -> Vec<(MessageRef, String)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn is_silent(&self) -> bool {
        self.sent().is_empty() && self.edits().is_empty()
    }
}

impl ChatTransport for RecordingTransport {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<MessageRef, TransportError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let message_id = *next_id;
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(MessageRef {
            chat_id,
            message_id,
        })
    }

    async fn edit_message(&self, msg: MessageRef, text: &str) -> Result<(), TransportError> {
        self.edits.lock().unwrap().push((msg, text.to_string()));
        Ok(())
    }
}
