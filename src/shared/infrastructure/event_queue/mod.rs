// Port for the durable queue between the producer and the consumer.
//
// Boundaries
// - Delivery is at least once. A received message stays in flight until it is
//   acknowledged, released for redelivery, or moved to the dead-letter list.
//   A delivery left unsettled past the visibility timeout counts as released.
// - No ordering is guaranteed across messages.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod in_memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    /// Handle for settling this delivery. Changes on every redelivery.
    pub receipt: String,
    pub body: String,
    /// Number of times this message has been delivered, this delivery included.
    pub receive_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub message_id: String,
    pub body: String,
    pub receive_count: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue call timed out after {0:?}")]
    Timeout(Duration),

    #[error("unknown receipt: {0}")]
    UnknownReceipt(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait QueueSender: Send + Sync {
    /// Submit one message body and return its message id.
    async fn send(&self, body: String) -> Result<String, QueueError>;
}

#[async_trait]
pub trait QueueReceiver: Send + Sync {
    async fn receive(&self, max_messages: usize) -> Result<Vec<QueueMessage>, QueueError>;

    async fn ack(&self, receipt: &str) -> Result<(), QueueError>;

    /// Give the message back for redelivery. Past the redrive threshold the
    /// queue moves it to the dead-letter list instead.
    async fn release(&self, receipt: &str) -> Result<(), QueueError>;

    async fn dead_letter(&self, receipt: &str, reason: &str) -> Result<(), QueueError>;
}
