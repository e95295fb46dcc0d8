// Typed access to the three aggregate collections.
//
// Purpose
// - Own every persisted representation: the consumer and the read path only
//   see EventCounter, ActorProfile and RepoRecord.
//
// Responsibilities
// - Bound every store call with the configured timeout.
// - Follow scan continuation tokens until the store reports no further page.
// - Skip records that fail their schema decode, and count them.

use crate::modules::github_events::adapters::outbound::aggregate_schema::{
    self, actors, event_counts, repos,
};
use crate::modules::github_events::core::aggregates::{ActorProfile, EventCounter, RepoRecord};
use crate::modules::github_events::core::decode_error::DecodeError;
use crate::shared::infrastructure::aggregate_store::{
    AggregateStore, AttributeValue, Condition, Item, Mutation, StoreError,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Store-level identifiers of the three collections, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub event_counts: String,
    pub actors: String,
    pub repos: String,
}

impl CollectionNames {
    /// Each collection paired with its key attribute.
    pub fn key_attributes(&self) -> [(&str, &'static str); 3] {
        [
            (self.event_counts.as_str(), event_counts::KEY),
            (self.actors.as_str(), actors::KEY),
            (self.repos.as_str(), repos::KEY),
        ]
    }
}

/// Records decoded by a full scan, plus the number skipped as undecodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

pub struct AggregateRepository {
    store: Arc<dyn AggregateStore>,
    collections: CollectionNames,
    call_timeout: Duration,
}

impl AggregateRepository {
    pub fn new(
        store: Arc<dyn AggregateStore>,
        collections: CollectionNames,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            collections,
            call_timeout,
        }
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.call_timeout))?
    }

    /// Add `delta` to the counter in one write, creating it when absent.
    pub async fn add_to_event_count(&self, event_type: &str, delta: i64) -> Result<(), StoreError> {
        self.bounded(self.store.conditional_write(
            &self.collections.event_counts,
            event_type,
            Condition::Always,
            Mutation::Add {
                attribute: event_counts::COUNT.to_string(),
                delta,
            },
        ))
        .await
    }

    /// `Count += 1`, guarded by the counter already existing.
    pub async fn increment_existing_event_count(&self, event_type: &str) -> Result<(), StoreError> {
        self.bounded(self.store.conditional_write(
            &self.collections.event_counts,
            event_type,
            Condition::Exists,
            Mutation::Add {
                attribute: event_counts::COUNT.to_string(),
                delta: 1,
            },
        ))
        .await
    }

    /// Create the counter at 1, guarded by it not existing yet.
    pub async fn create_event_count(&self, event_type: &str) -> Result<(), StoreError> {
        self.bounded(self.store.conditional_write(
            &self.collections.event_counts,
            event_type,
            Condition::NotExists,
            Mutation::Put(Item::from([(
                event_counts::COUNT.to_string(),
                AttributeValue::N(1),
            )])),
        ))
        .await
    }

    pub async fn upsert_actor(&self, profile: &ActorProfile) -> Result<(), StoreError> {
        self.bounded(self.store.conditional_write(
            &self.collections.actors,
            &profile.login,
            Condition::Always,
            Mutation::Set(aggregate_schema::encode_actor_profile(profile)),
        ))
        .await
    }

    pub async fn upsert_repo(&self, record: &RepoRecord) -> Result<(), StoreError> {
        self.bounded(self.store.conditional_write(
            &self.collections.repos,
            &record.repo_url,
            Condition::Always,
            Mutation::Set(aggregate_schema::encode_repo_record(record)),
        ))
        .await
    }

    pub async fn get_event_count(&self, event_type: &str) -> Result<Option<EventCounter>, StoreError> {
        self.get_decoded(
            &self.collections.event_counts,
            event_type,
            aggregate_schema::decode_event_counter,
        )
        .await
    }

    pub async fn get_actor(&self, login: &str) -> Result<Option<ActorProfile>, StoreError> {
        self.get_decoded(&self.collections.actors, login, aggregate_schema::decode_actor_profile)
            .await
    }

    pub async fn get_repo(&self, repo_url: &str) -> Result<Option<RepoRecord>, StoreError> {
        self.get_decoded(&self.collections.repos, repo_url, aggregate_schema::decode_repo_record)
            .await
    }

    pub async fn scan_event_counts(&self) -> Result<Scanned<EventCounter>, StoreError> {
        self.scan_all(
            &self.collections.event_counts,
            event_counts::KEY,
            aggregate_schema::decode_event_counter,
        )
        .await
    }

    pub async fn scan_actors(&self) -> Result<Scanned<ActorProfile>, StoreError> {
        self.scan_all(
            &self.collections.actors,
            actors::KEY,
            aggregate_schema::decode_actor_profile,
        )
        .await
    }

    pub async fn scan_repos(&self) -> Result<Scanned<RepoRecord>, StoreError> {
        self.scan_all(&self.collections.repos, repos::KEY, aggregate_schema::decode_repo_record)
            .await
    }

    /// An undecodable record read by key is reported as absent.
    async fn get_decoded<T>(
        &self,
        collection: &str,
        key: &str,
        decode: fn(&Item) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, StoreError> {
        let Some(item) = self.bounded(self.store.get(collection, key)).await? else {
            return Ok(None);
        };
        match decode(&item) {
            Ok(record) => Ok(Some(record)),
            Err(error) => {
                tracing::warn!(collection, key, %error, "stored record does not decode");
                Ok(None)
            }
        }
    }

    async fn scan_all<T>(
        &self,
        collection: &str,
        key_attribute: &str,
        decode: fn(&Item) -> Result<T, DecodeError>,
    ) -> Result<Scanned<T>, StoreError> {
        let mut records = Vec::new();
        let mut skipped = 0;
        let mut token = None;
        loop {
            let page = self
                .bounded(self.store.scan_page(collection, token.take()))
                .await?;
            for item in &page.items {
                match decode(item) {
                    Ok(record) => records.push(record),
                    Err(error) => {
                        skipped += 1;
                        tracing::warn!(
                            collection,
                            key = item.get(key_attribute).and_then(AttributeValue::as_str),
                            %error,
                            "skipping undecodable record"
                        );
                    }
                }
            }
            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(Scanned { records, skipped })
    }
}
