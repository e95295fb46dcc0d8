// Folds queue messages into the three aggregates.
//
// Responsibilities
// - Decode the message body into a RawEvent.
// - Attempt the counter, actor and repo upserts together and report every
//   failure, never stopping at the first one.
// - Report per-message outcomes for a batch instead of aborting it.
//
// The handler holds no state between calls; all shared state is in the store.

use crate::modules::github_events::adapters::outbound::aggregate_repository::AggregateRepository;
use crate::modules::github_events::core::aggregates::{ActorProfile, RepoRecord};
use crate::modules::github_events::core::raw_event::RawEvent;
use crate::modules::github_events::use_cases::consume_event::counter::{
    CounterStrategy, increment_event_count,
};
use crate::modules::github_events::use_cases::consume_event::errors::{
    ConsumeError, UpsertFailure, UpsertTarget,
};
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::event_queue::QueueMessage;
use futures_util::future::join_all;
use std::sync::Arc;

/// Outcome of one message within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Applied,
    /// Transient failure. The message should be redelivered.
    Retry(String),
    /// Permanent failure. The message should go to the dead-letter list.
    Reject(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedMessage {
    pub message_id: String,
    pub receipt: String,
    pub outcome: MessageOutcome,
}

pub struct EventConsumer {
    repository: Arc<AggregateRepository>,
    clock: Arc<dyn Clock>,
    counter_strategy: CounterStrategy,
}

impl EventConsumer {
    pub fn new(
        repository: Arc<AggregateRepository>,
        clock: Arc<dyn Clock>,
        counter_strategy: CounterStrategy,
    ) -> Self {
        Self {
            repository,
            clock,
            counter_strategy,
        }
    }

    pub async fn process(&self, message: &QueueMessage) -> Result<(), ConsumeError> {
        tracing::debug!(
            message_id = %message.message_id,
            receive_count = message.receive_count,
            "processing message"
        );
        let event = RawEvent::from_message_body(&message.body)?;
        self.apply(&event).await
    }

    /// Apply the three upserts of one event. All three are attempted.
    pub async fn apply(&self, event: &RawEvent) -> Result<(), ConsumeError> {
        let profile = ActorProfile::from_event(event, self.clock.now_unix_seconds());
        let record = RepoRecord::from_event(event);

        let (counted, actor, repo) = tokio::join!(
            increment_event_count(&self.repository, &event.event_type, self.counter_strategy),
            self.repository.upsert_actor(&profile),
            self.repository.upsert_repo(&record),
        );

        let failures: Vec<UpsertFailure> = [
            (UpsertTarget::EventCount, counted),
            (UpsertTarget::Actor, actor),
            (UpsertTarget::Repo, repo),
        ]
        .into_iter()
        .filter_map(|(target, result)| result.err().map(|error| UpsertFailure { target, error }))
        .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConsumeError::Upserts(failures))
        }
    }

    /// Process a batch concurrently. One bad message never affects the others.
    pub async fn process_batch(&self, messages: Vec<QueueMessage>) -> Vec<ProcessedMessage> {
        join_all(messages.into_iter().map(|message| async move {
            let outcome = match self.process(&message).await {
                Ok(()) => MessageOutcome::Applied,
                Err(error) if error.is_retryable() => {
                    tracing::warn!(message_id = %message.message_id, %error, "message failed, will be redelivered");
                    MessageOutcome::Retry(error.to_string())
                }
                Err(error) => {
                    tracing::error!(message_id = %message.message_id, %error, "message rejected");
                    MessageOutcome::Reject(error.to_string())
                }
            };
            ProcessedMessage {
                message_id: message.message_id,
                receipt: message.receipt,
                outcome,
            }
        }))
        .await
    }
}
