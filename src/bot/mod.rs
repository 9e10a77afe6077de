//! Operator-facing bot: input parsing, allow-list gate, chat transport,
//! long-poll run loop.

pub mod command;
pub mod handler;
pub mod run;
pub mod transport;

pub use command::Command;
pub use handler::Handler;
pub use transport::{ChatTransport, Inbound, OperatorId, TelegramApi};
