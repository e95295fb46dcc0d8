// Read path over the three aggregates.
//
// Responsibilities
// - Dispatch a named field to its query.
// - Enrich repo records with a live star count, a bounded number of lookups
//   at a time. A failed or slow lookup leaves that record at 0 stars.
//
// A query returns either the whole array or one error, never a mix.

use crate::modules::github_events::adapters::outbound::aggregate_repository::AggregateRepository;
use crate::modules::github_events::core::aggregates::RepoRecord;
use crate::modules::github_events::use_cases::query_aggregates::enrichment_port::RepoMetadataSource;
use crate::modules::github_events::use_cases::query_aggregates::field::QueryField;
use crate::modules::github_events::use_cases::query_aggregates::views::{
    ActorView, EventCountView, RepoView,
};
use crate::shared::infrastructure::aggregate_store::StoreError;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverRequest {
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Repos(Vec<RepoView>),
    Actors(Vec<ActorView>),
    Events(Vec<EventCountView>),
}

impl QueryResult {
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Repos(rows) => rows.len(),
            QueryResult::Actors(rows) => rows.len(),
            QueryResult::Events(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown field: {0:?}")]
    UnknownField(String),

    #[error("aggregate store error: {0}")]
    Store(#[from] StoreError),
}

pub struct AggregateQueries {
    repository: Arc<AggregateRepository>,
    metadata: Arc<dyn RepoMetadataSource>,
    call_timeout: Duration,
    enrichment_concurrency: usize,
}

impl AggregateQueries {
    pub fn new(
        repository: Arc<AggregateRepository>,
        metadata: Arc<dyn RepoMetadataSource>,
        call_timeout: Duration,
        enrichment_concurrency: usize,
    ) -> Self {
        Self {
            repository,
            metadata,
            call_timeout,
            enrichment_concurrency: enrichment_concurrency.max(1),
        }
    }

    pub async fn resolve(&self, request: &ResolverRequest) -> Result<QueryResult, QueryError> {
        let field = QueryField::from_str(&request.field)
            .map_err(|_| QueryError::UnknownField(request.field.clone()))?;
        let result = match field {
            QueryField::Repos => QueryResult::Repos(self.list_repos().await?),
            QueryField::Actors => QueryResult::Actors(self.list_actors().await?),
            QueryField::Events => QueryResult::Events(self.list_event_counts().await?),
        };
        tracing::info!(%field, rows = result.len(), "query resolved");
        Ok(result)
    }

    pub async fn list_repos(&self) -> Result<Vec<RepoView>, StoreError> {
        let scanned = self.repository.scan_repos().await?;
        let views: Vec<RepoView> = stream::iter(scanned.records)
            .map(|record| self.enrich(record))
            .buffered(self.enrichment_concurrency)
            .collect()
            .await;
        Ok(views)
    }

    pub async fn list_actors(&self) -> Result<Vec<ActorView>, StoreError> {
        let scanned = self.repository.scan_actors().await?;
        Ok(scanned.records.into_iter().map(ActorView::from).collect())
    }

    pub async fn list_event_counts(&self) -> Result<Vec<EventCountView>, StoreError> {
        let scanned = self.repository.scan_event_counts().await?;
        Ok(scanned.records.into_iter().map(EventCountView::from).collect())
    }

    async fn enrich(&self, record: RepoRecord) -> RepoView {
        if !record.is_enrichable() {
            return RepoView::new(record, 0);
        }
        let repo_id = record.repo_id;
        let stars = match tokio::time::timeout(self.call_timeout, self.metadata.star_count(repo_id)).await {
            Ok(Ok(stars)) => stars,
            Ok(Err(error)) => {
                tracing::warn!(repo_id, %error, "star lookup failed, defaulting to 0");
                0
            }
            Err(_) => {
                tracing::warn!(repo_id, "star lookup timed out, defaulting to 0");
                0
            }
        };
        RepoView::new(record, stars)
    }
}
