// Queue polling loop for the consumer.
//
// One batch at a time: receive, process concurrently, then settle every
// delivery. Applied messages are acked, retryable failures released for
// redelivery, and undecodable messages dead-lettered. A delivery whose
// settle call fails stays in flight until the queue's visibility timeout
// hands it out again.

use crate::modules::github_events::use_cases::consume_event::handler::{
    EventConsumer, MessageOutcome,
};
use crate::shared::infrastructure::event_queue::{QueueError, QueueReceiver};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Counts of one `run_once` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub received: usize,
    pub acked: usize,
    pub released: usize,
    pub dead_lettered: usize,
    /// Settle calls that failed.
    pub unsettled: usize,
}

pub struct ConsumerWorker {
    consumer: Arc<EventConsumer>,
    queue: Arc<dyn QueueReceiver>,
    batch_size: usize,
    call_timeout: Duration,
    idle_backoff: Duration,
}

impl ConsumerWorker {
    pub fn new(
        consumer: Arc<EventConsumer>,
        queue: Arc<dyn QueueReceiver>,
        batch_size: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            consumer,
            queue,
            batch_size: batch_size.max(1),
            call_timeout,
            idle_backoff: Duration::from_millis(500),
        }
    }

    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, QueueError>>,
    ) -> Result<T, QueueError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| QueueError::Timeout(self.call_timeout))?
    }

    /// Receive and settle one batch.
    pub async fn run_once(&self) -> Result<BatchSummary, QueueError> {
        let messages = self.bounded(self.queue.receive(self.batch_size)).await?;
        let mut summary = BatchSummary {
            received: messages.len(),
            ..BatchSummary::default()
        };
        if messages.is_empty() {
            return Ok(summary);
        }

        for processed in self.consumer.process_batch(messages).await {
            let (settled, counter) = match &processed.outcome {
                MessageOutcome::Applied => (
                    self.bounded(self.queue.ack(&processed.receipt)).await,
                    &mut summary.acked,
                ),
                MessageOutcome::Retry(_) => (
                    self.bounded(self.queue.release(&processed.receipt)).await,
                    &mut summary.released,
                ),
                MessageOutcome::Reject(reason) => (
                    self.bounded(self.queue.dead_letter(&processed.receipt, reason))
                        .await,
                    &mut summary.dead_lettered,
                ),
            };
            match settled {
                Ok(()) => *counter += 1,
                Err(error) => {
                    summary.unsettled += 1;
                    tracing::warn!(message_id = %processed.message_id, %error, "could not settle message");
                }
            }
        }

        tracing::info!(
            received = summary.received,
            acked = summary.acked,
            released = summary.released,
            dead_lettered = summary.dead_lettered,
            unsettled = summary.unsettled,
            "consumer batch settled"
        );
        Ok(summary)
    }

    pub async fn run(self) {
        tracing::info!(batch_size = self.batch_size, "consumer worker started");
        loop {
            match self.run_once().await {
                Ok(summary) if summary.received > 0 => {}
                Ok(_) => tokio::time::sleep(self.idle_backoff).await,
                Err(error) => {
                    tracing::error!(%error, "queue receive failed");
                    tokio::time::sleep(self.idle_backoff).await;
                }
            }
        }
    }
}
