use crate::modules::github_events::core::decode_error::DecodeError;
use crate::shared::infrastructure::aggregate_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UpsertTarget {
    #[strum(serialize = "event count")]
    EventCount,
    #[strum(serialize = "actor")]
    Actor,
    #[strum(serialize = "repo")]
    Repo,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{target} upsert failed: {error}")]
pub struct UpsertFailure {
    pub target: UpsertTarget,
    pub error: StoreError,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsumeError {
    /// The message can never be processed. Route it to the dead-letter list.
    #[error("undecodable message: {0}")]
    Decode(#[from] DecodeError),

    /// Every upsert was attempted; these are the ones that failed.
    #[error("{} of 3 upserts failed: {}", .0.len(), describe(.0))]
    Upserts(Vec<UpsertFailure>),
}

impl ConsumeError {
    /// Whether redelivering the message can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConsumeError::Decode(_) => false,
            ConsumeError::Upserts(failures) => {
                failures.iter().any(|failure| failure.error.is_retryable())
            }
        }
    }
}

fn describe(failures: &[UpsertFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
