pub mod telegram;

pub use telegram::TelegramClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Id of the last inbound update already handled.
///
/// Passed into every poll and replaced by the value the poll returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UpdateCursor(pub i64);

impl UpdateCursor {
    /// Offset to request: first update not yet seen
    pub fn next_offset(&self) -> i64 {
        self.0 + 1
    }

    pub fn advance(self, update_id: i64) -> Self {
        Self(self.0.max(update_id))
    }
}

/// A free-text message from a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub update_id: i64,
    pub chat_id: i64,
    pub text: String,
}

/// Chat channel used to deliver alerts and receive questions
#[async_trait]
pub trait MessageTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Fetch messages newer than `cursor`, returning them with the advanced cursor
    async fn poll(&self, cursor: UpdateCursor) -> Result<(Vec<IncomingMessage>, UpdateCursor)>;
}
