// Counter upsert strategies.
//
// AtomicAdd relies on the store's add-if-absent-else-increment write and is the
// default. ConditionalWithRetry is for stores without that primitive: it tries
// the guarded increment, then the guarded create, and loops when it loses the
// create race, so two first sightings end at 2 instead of 1.
//
// Neither strategy can tell a redelivered message from a second real event, so
// a redelivery counts twice.

use crate::modules::github_events::adapters::outbound::aggregate_repository::AggregateRepository;
use crate::shared::infrastructure::aggregate_store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterStrategy {
    #[default]
    AtomicAdd,
    ConditionalWithRetry { max_attempts: u32 },
}

pub async fn increment_event_count(
    repository: &AggregateRepository,
    event_type: &str,
    strategy: CounterStrategy,
) -> Result<(), StoreError> {
    match strategy {
        CounterStrategy::AtomicAdd => repository.add_to_event_count(event_type, 1).await,
        CounterStrategy::ConditionalWithRetry { max_attempts } => {
            let max_attempts = max_attempts.max(1);
            let mut attempt = 0;
            loop {
                attempt += 1;
                match repository.increment_existing_event_count(event_type).await {
                    Ok(()) => return Ok(()),
                    Err(StoreError::ConditionFailed { .. }) => {}
                    Err(error) => return Err(error),
                }
                match repository.create_event_count(event_type).await {
                    Ok(()) => return Ok(()),
                    Err(error @ StoreError::ConditionFailed { .. }) => {
                        if attempt >= max_attempts {
                            return Err(error);
                        }
                        tracing::warn!(event_type, attempt, "lost counter create race, retrying");
                    }
                    Err(error) => return Err(error),
                }
            }
        }
    }
}
