use crate::modules::github_events::core::raw_event::RawEvent;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("event feed is rate limited")]
    RateLimited,

    #[error("event feed unavailable: {0}")]
    Unavailable(String),

    #[error("event feed call timed out")]
    Timeout,
}

/// Source of raw events. One call returns one bounded page.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch_page(&self) -> Result<Vec<RawEvent>, FeedError>;
}
