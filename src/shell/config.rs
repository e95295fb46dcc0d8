// Process configuration, read once at startup.
//
// Missing required settings are fatal: `main` exits before anything starts.

use crate::modules::github_events::adapters::outbound::aggregate_repository::CollectionNames;
use crate::shared::infrastructure::github::GITHUB_API_URL;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const EVENTS_COUNT_TABLE: &str = "EVENTS_COUNT_TABLE";
pub const ACTORS_TABLE: &str = "ACTORS_TABLE";
pub const REPOS_TABLE: &str = "REPOS_TABLE";
pub const GITHUB_CONSUMER_QUEUE_URL: &str = "GITHUB_CONSUMER_QUEUE_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required setting {0} is missing or empty")]
    Missing(&'static str),

    #[error("setting {name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub collections: CollectionNames,
    pub queue_url: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub bind_addr: SocketAddr,
    /// `None` leaves fetching to an external scheduler calling `POST /fetch`.
    pub fetch_interval: Option<Duration>,
    pub consumer_batch_size: usize,
    pub consumer_max_receives: u32,
    pub queue_visibility_timeout: Duration,
    pub call_timeout: Duration,
    pub enrichment_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| value(name).ok_or(ConfigError::Missing(name));

        let collections = CollectionNames {
            event_counts: required(EVENTS_COUNT_TABLE)?,
            actors: required(ACTORS_TABLE)?,
            repos: required(REPOS_TABLE)?,
        };
        let queue_url = required(GITHUB_CONSUMER_QUEUE_URL)?;

        let fetch_interval_secs: u64 = parsed(&value, "FETCH_INTERVAL_SECS", 0)?;
        let consumer_batch_size: usize = parsed(&value, "CONSUMER_BATCH_SIZE", 10)?;
        let consumer_max_receives: u32 = parsed(&value, "CONSUMER_MAX_RECEIVES", 5)?;
        let visibility_timeout_secs: u64 = parsed(&value, "QUEUE_VISIBILITY_TIMEOUT_SECS", 30)?;
        let call_timeout_ms: u64 = parsed(&value, "CALL_TIMEOUT_MS", 5000)?;
        let enrichment_concurrency: usize = parsed(&value, "ENRICHMENT_CONCURRENCY", 8)?;

        for (name, setting) in [
            ("CONSUMER_BATCH_SIZE", consumer_batch_size as u64),
            ("CONSUMER_MAX_RECEIVES", u64::from(consumer_max_receives)),
            ("QUEUE_VISIBILITY_TIMEOUT_SECS", visibility_timeout_secs),
            ("CALL_TIMEOUT_MS", call_timeout_ms),
            ("ENRICHMENT_CONCURRENCY", enrichment_concurrency as u64),
        ] {
            if setting == 0 {
                return Err(ConfigError::Invalid {
                    name,
                    value: "0".into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }

        Ok(Self {
            collections,
            queue_url,
            github_api_url: value("GITHUB_API_URL").unwrap_or_else(|| GITHUB_API_URL.to_string()),
            github_token: value("GITHUB_TOKEN"),
            bind_addr: parsed(&value, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            fetch_interval: (fetch_interval_secs > 0).then(|| Duration::from_secs(fetch_interval_secs)),
            consumer_batch_size,
            consumer_max_receives,
            queue_visibility_timeout: Duration::from_secs(visibility_timeout_secs),
            call_timeout: Duration::from_millis(call_timeout_ms),
            enrichment_concurrency,
        })
    }
}

fn parsed<T>(
    value: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
