//! Wire shapes of the GitHub REST responses this crate reads.

use serde::Deserialize;

/// One entry of `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    pub actor: GitHubActor,
    pub repo: GitHubRepoRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubActor {
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubRepoRef {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Subset of `GET /repositories/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub stargazers_count: u64,
}
