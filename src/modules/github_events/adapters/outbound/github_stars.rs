// GitHub repository lookup as a RepoMetadataSource.

use crate::modules::github_events::use_cases::query_aggregates::enrichment_port::{
    EnrichmentError, RepoMetadataSource,
};
use crate::shared::infrastructure::github::{GitHubClient, GitHubError};
use async_trait::async_trait;

impl From<GitHubError> for EnrichmentError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::RateLimited { .. } => EnrichmentError::RateLimited,
            GitHubError::NotFound(_) => EnrichmentError::NotFound,
            GitHubError::Timeout => EnrichmentError::Timeout,
            other => EnrichmentError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl RepoMetadataSource for GitHubClient {
    async fn star_count(&self, repo_id: i64) -> Result<u64, EnrichmentError> {
        Ok(self.get_repository(repo_id).await?.stargazers_count)
    }
}
