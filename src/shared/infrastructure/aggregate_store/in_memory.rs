// In memory implementation of the AggregateStore port.
//
// Purpose
// - Run the pipeline locally and in tests without an external key-value store.
//
// Responsibilities
// - Keep each collection ordered by key so scans page deterministically.
// - Evaluate the write condition and apply the mutation under one lock.

use crate::shared::infrastructure::aggregate_store::{
    AggregateStore, AttributeValue, Condition, ContinuationToken, Item, Mutation, ScanPage,
    StoreError,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 100;

struct Collection {
    key_attribute: String,
    items: BTreeMap<String, Item>,
}

pub struct InMemoryAggregateStore {
    collections: RwLock<HashMap<String, Collection>>,
    page_size: usize,
    is_offline: bool,
    failing_writes: HashSet<String>,
    delay_write_ms: AtomicU64,
}

impl Default for InMemoryAggregateStore {
    fn default() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
            is_offline: false,
            failing_writes: HashSet::new(),
            delay_write_ms: AtomicU64::new(0),
        }
    }
}

impl InMemoryAggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register a collection. Every item written to it carries `key_attribute`.
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        key_attribute: impl Into<String>,
    ) -> Self {
        self.collections.get_mut().insert(
            name.into(),
            Collection {
                key_attribute: key_attribute.into(),
                items: BTreeMap::new(),
            },
        );
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Make every write to `collection` fail with a backend error.
    pub fn fail_writes_to(&mut self, collection: impl Into<String>) {
        self.failing_writes.insert(collection.into());
    }

    pub fn set_delay_write_ms(&self, ms: u64) {
        self.delay_write_ms.store(ms, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("Aggregate store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AggregateStore for InMemoryAggregateStore {
    async fn scan_page(
        &self,
        collection: &str,
        start: Option<ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        self.ensure_online()?;
        let guard = self.collections.read().await;
        let stored = guard
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let lower = match &start {
            Some(ContinuationToken(last_key)) => Bound::Excluded(last_key.clone()),
            None => Bound::Unbounded,
        };
        let mut remaining = stored.items.range((lower, Bound::Unbounded));
        let page: Vec<(&String, &Item)> = remaining.by_ref().take(self.page_size).collect();
        let next = match (page.last(), remaining.next()) {
            (Some((last_key, _)), Some(_)) => Some(ContinuationToken((*last_key).clone())),
            _ => None,
        };

        Ok(ScanPage {
            items: page.into_iter().map(|(_, item)| item.clone()).collect(),
            next,
        })
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Item>, StoreError> {
        self.ensure_online()?;
        let guard = self.collections.read().await;
        let stored = guard
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        Ok(stored.items.get(key).cloned())
    }

    async fn conditional_write(
        &self,
        collection: &str,
        key: &str,
        condition: Condition,
        mutation: Mutation,
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        if self.failing_writes.contains(collection) {
            return Err(StoreError::Backend(format!("writes to {collection} rejected")));
        }
        let delay = self.delay_write_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut guard = self.collections.write().await;
        let stored = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let exists = stored.items.contains_key(key);
        let condition_holds = match condition {
            Condition::Always => true,
            Condition::Exists => exists,
            Condition::NotExists => !exists,
        };
        if !condition_holds {
            return Err(StoreError::ConditionFailed {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        let key_attribute = stored.key_attribute.clone();
        let key_value = AttributeValue::S(key.to_string());
        match mutation {
            Mutation::Put(mut item) => {
                item.insert(key_attribute, key_value);
                stored.items.insert(key.to_string(), item);
            }
            Mutation::Set(attributes) => {
                let item = stored
                    .items
                    .entry(key.to_string())
                    .or_insert_with(|| Item::from([(key_attribute, key_value)]));
                item.extend(attributes);
            }
            Mutation::Add { attribute, delta } => {
                let current = match stored.items.get(key).and_then(|item| item.get(&attribute)) {
                    None => 0,
                    Some(AttributeValue::N(value)) => *value,
                    Some(AttributeValue::S(_)) => {
                        return Err(StoreError::TypeMismatch {
                            collection: collection.to_string(),
                            key: key.to_string(),
                            attribute,
                        });
                    }
                };
                let Some(next) = current.checked_add(delta) else {
                    return Err(StoreError::Overflow {
                        collection: collection.to_string(),
                        key: key.to_string(),
                        attribute,
                        delta,
                    });
                };
                let item = stored
                    .items
                    .entry(key.to_string())
                    .or_insert_with(|| Item::from([(key_attribute, key_value)]));
                item.insert(attribute, AttributeValue::N(next));
            }
        }
        Ok(())
    }
}
