// Port for the key-value store that holds the derived aggregates.
//
// Purpose
// - Describe the three capabilities the pipeline needs: paged scan, get by key,
//   and a conditional single-key write.
//
// Boundaries
// - Writes are atomic per key. There is no cross-key or cross-collection transaction.
// - A scan is a sequence of pages. Callers follow `ScanPage::next` until it is `None`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

pub mod in_memory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(i64),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::S(value) => Some(value),
            AttributeValue::N(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            AttributeValue::N(value) => Some(*value),
            AttributeValue::S(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::S(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::N(value)
    }
}

/// One stored record: attribute name to value. The key attribute is always present.
pub type Item = BTreeMap<String, AttributeValue>;

/// Guard evaluated atomically with the write it protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Exists,
    NotExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the whole item.
    Put(Item),
    /// Overwrite the given attributes and keep every other attribute.
    Set(Item),
    /// Add `delta` to a numeric attribute, starting from zero when the item
    /// or the attribute is absent.
    Add { attribute: String, delta: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuationToken(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub next: Option<ContinuationToken>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("condition failed for {collection}/{key}")]
    ConditionFailed { collection: String, key: String },

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("attribute {attribute} of {collection}/{key} is not numeric")]
    TypeMismatch {
        collection: String,
        key: String,
        attribute: String,
    },

    #[error("adding {delta} to {attribute} of {collection}/{key} overflows")]
    Overflow {
        collection: String,
        key: String,
        attribute: String,
        delta: i64,
    },

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether repeating the same call later can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StoreError::TypeMismatch { .. } | StoreError::Overflow { .. }
        )
    }
}

#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn scan_page(
        &self,
        collection: &str,
        start: Option<ContinuationToken>,
    ) -> Result<ScanPage, StoreError>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Item>, StoreError>;

    async fn conditional_write(
        &self,
        collection: &str,
        key: &str,
        condition: Condition,
        mutation: Mutation,
    ) -> Result<(), StoreError>;
}
