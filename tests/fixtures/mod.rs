#![allow(dead_code)]

pub mod store;
pub mod transport;

pub use store::MemoryStore;
pub use transport::RecordingTransport;
