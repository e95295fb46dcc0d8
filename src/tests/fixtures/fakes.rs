// Scriptable stand-ins for the two external GitHub calls.

use crate::modules::github_events::core::raw_event::RawEvent;
use crate::modules::github_events::use_cases::fetch_events::feed_port::{EventFeed, FeedError};
use crate::modules::github_events::use_cases::query_aggregates::enrichment_port::{
    EnrichmentError, RepoMetadataSource,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
pub struct FakeFeed {
    events: Vec<RawEvent>,
    is_offline: bool,
}

#[allow(dead_code)]
impl FakeFeed {
    pub fn with_events(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait]
impl EventFeed for FakeFeed {
    async fn fetch_page(&self) -> Result<Vec<RawEvent>, FeedError> {
        if self.is_offline {
            return Err(FeedError::Unavailable("Event feed offline".into()));
        }
        Ok(self.events.clone())
    }
}

#[derive(Default)]
pub struct FakeMetadataSource {
    stars: HashMap<i64, u64>,
    failing: HashSet<i64>,
    delayed: HashMap<i64, Duration>,
    is_offline: bool,
}

#[allow(dead_code)]
impl FakeMetadataSource {
    pub fn with_stars(stars: impl IntoIterator<Item = (i64, u64)>) -> Self {
        Self {
            stars: stars.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Lookups for these ids fail with a rate-limit error.
    pub fn failing_for(mut self, repo_ids: impl IntoIterator<Item = i64>) -> Self {
        self.failing.extend(repo_ids);
        self
    }

    pub fn delayed_for(mut self, repo_ids: impl IntoIterator<Item = i64>, delay: Duration) -> Self {
        self.delayed.extend(repo_ids.into_iter().map(|id| (id, delay)));
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait]
impl RepoMetadataSource for FakeMetadataSource {
    async fn star_count(&self, repo_id: i64) -> Result<u64, EnrichmentError> {
        if self.is_offline {
            return Err(EnrichmentError::Unavailable("Metadata source offline".into()));
        }
        if let Some(delay) = self.delayed.get(&repo_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&repo_id) {
            return Err(EnrichmentError::RateLimited);
        }
        self.stars
            .get(&repo_id)
            .copied()
            .ok_or(EnrichmentError::NotFound)
    }
}
