use crate::modules::github_events::adapters::outbound::aggregate_repository::{
    AggregateRepository, CollectionNames,
};
use crate::shared::infrastructure::aggregate_store::in_memory::InMemoryAggregateStore;
use std::sync::Arc;
use std::time::Duration;

pub fn collection_names() -> CollectionNames {
    CollectionNames {
        event_counts: "events-counter".to_string(),
        actors: "actors".to_string(),
        repos: "repos".to_string(),
    }
}

/// A store with the three collections already created.
pub fn in_memory_store() -> InMemoryAggregateStore {
    collection_names()
        .key_attributes()
        .into_iter()
        .fold(InMemoryAggregateStore::new(), |store, (name, key)| {
            store.with_collection(name, key)
        })
}

pub fn repository_over(store: InMemoryAggregateStore) -> Arc<AggregateRepository> {
    Arc::new(AggregateRepository::new(
        Arc::new(store),
        collection_names(),
        Duration::from_secs(1),
    ))
}
