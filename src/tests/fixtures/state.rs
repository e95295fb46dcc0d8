use crate::modules::github_events::adapters::outbound::aggregate_repository::AggregateRepository;
use crate::modules::github_events::use_cases::fetch_events::handler::FetchEventsHandler;
use crate::modules::github_events::use_cases::query_aggregates::handler::AggregateQueries;
use crate::shared::infrastructure::event_queue::in_memory::InMemoryQueue;
use crate::shell::state::AppState;
use crate::tests::fixtures::fakes::{FakeFeed, FakeMetadataSource};
use crate::tests::fixtures::stores::{in_memory_store, repository_over};
use std::sync::Arc;
use std::time::Duration;

pub fn make_state(
    feed: FakeFeed,
    queue: Arc<InMemoryQueue>,
    repository: Arc<AggregateRepository>,
    metadata: FakeMetadataSource,
) -> AppState {
    AppState {
        fetch_handler: Arc::new(FetchEventsHandler::new(
            Arc::new(feed),
            queue,
            Duration::from_secs(1),
        )),
        queries: Arc::new(AggregateQueries::new(
            repository,
            Arc::new(metadata),
            Duration::from_secs(1),
            4,
        )),
    }
}

/// State over an empty store and a metadata source that knows no repos.
pub fn make_test_state(feed: FakeFeed, queue: Arc<InMemoryQueue>) -> AppState {
    make_state(
        feed,
        queue,
        repository_over(in_memory_store()),
        FakeMetadataSource::default(),
    )
}
