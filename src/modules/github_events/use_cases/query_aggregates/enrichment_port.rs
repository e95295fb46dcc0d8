use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("metadata source is rate limited")]
    RateLimited,

    #[error("repository not found")]
    NotFound,

    #[error("metadata lookup timed out")]
    Timeout,

    #[error("metadata source unavailable: {0}")]
    Unavailable(String),
}

/// Live repository metadata, keyed by numeric repo id.
#[async_trait]
pub trait RepoMetadataSource: Send + Sync {
    async fn star_count(&self, repo_id: i64) -> Result<u64, EnrichmentError>;
}
