//! Minimal client for the public GitHub REST API.
//!
//! Two calls are needed: the public event feed and a repository lookup by
//! numeric id. Without a token the client is limited to unauthenticated,
//! rate-limited access.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub mod types;

use types::{GitHubEvent, GitHubRepository};

/// Public GitHub API host.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const CLIENT_USER_AGENT: &str = concat!("github_events/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub rate limit exceeded (resets at {reset_at:?})")]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GitHub request timed out")]
    Timeout,

    #[error("HTTP request error: {0}")]
    Http(String),

    #[error("JSON deserialization error: {0}")]
    Deserialize(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl GitHubError {
    /// Classify a non-success response into a typed error.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, path: &str, body: &str) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let quota_spent = header("x-ratelimit-remaining") == Some("0");

        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && quota_spent)
        {
            let reset_at = header("x-ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|seconds| DateTime::from_timestamp(seconds, 0));
            Self::RateLimited { reset_at }
        } else if status == StatusCode::NOT_FOUND {
            Self::NotFound(path.to_string())
        } else {
            Self::Api {
                status: status.as_u16(),
                message: body.lines().next().unwrap_or_default().to_string(),
            }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Deserialize(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GitHubError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// One page of the public event feed, as served by `GET /events`.
    pub async fn list_public_events(&self) -> Result<Vec<GitHubEvent>, GitHubError> {
        self.get_json("/events").await
    }

    pub async fn get_repository(&self, repo_id: i64) -> Result<GitHubRepository, GitHubError> {
        self.get_json(&format!("/repositories/{repo_id}")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::from_status(status, &headers, path, &body));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GitHubError::Deserialize(e.to_string()))
    }
}
