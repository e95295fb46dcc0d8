// GitHub public event feed as an EventFeed.

use crate::modules::github_events::core::raw_event::RawEvent;
use crate::modules::github_events::use_cases::fetch_events::feed_port::{EventFeed, FeedError};
use crate::shared::infrastructure::github::types::GitHubEvent;
use crate::shared::infrastructure::github::{GitHubClient, GitHubError};
use async_trait::async_trait;

impl From<GitHubError> for FeedError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::RateLimited { .. } => FeedError::RateLimited,
            GitHubError::Timeout => FeedError::Timeout,
            other => FeedError::Unavailable(other.to_string()),
        }
    }
}

/// Map one feed entry. Entries without a type carry no counter key and are dropped.
pub fn raw_event_from(event: GitHubEvent) -> Option<RawEvent> {
    let event_type = event.event_type.filter(|t| !t.is_empty())?;
    Some(RawEvent {
        actor_login: event.actor.login,
        actor_email: event.actor.email.unwrap_or_default(),
        actor_name: event.actor.name.unwrap_or_default(),
        repo_url: event.repo.url,
        repo_name: event.repo.name,
        repo_id: event.repo.id,
        event_type,
    })
}

#[async_trait]
impl EventFeed for GitHubClient {
    async fn fetch_page(&self) -> Result<Vec<RawEvent>, FeedError> {
        let page = self.list_public_events().await?;
        let total = page.len();
        let events: Vec<RawEvent> = page.into_iter().filter_map(raw_event_from).collect();
        if events.len() < total {
            tracing::warn!(dropped = total - events.len(), "feed entries without an event type");
        }
        Ok(events)
    }
}
