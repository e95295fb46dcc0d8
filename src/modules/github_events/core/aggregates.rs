use crate::modules::github_events::core::raw_event::RawEvent;

/// Number of consumed events of one type. Keyed by `event_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCounter {
    pub event_type: String,
    pub count: u64,
}

/// Last-seen profile of an actor. Keyed by `login`, last write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
    pub login: String,
    pub name: String,
    pub email: String,
    /// Unix seconds at which the consumer applied the latest event.
    pub last_action_timestamp: i64,
}

impl ActorProfile {
    pub fn from_event(event: &RawEvent, applied_at: i64) -> Self {
        Self {
            login: event.actor_login.clone(),
            name: event.actor_name.clone(),
            email: event.actor_email.clone(),
            last_action_timestamp: applied_at,
        }
    }
}

/// Identity of a repository. Keyed by `repo_url`; `repo_id` is the key for
/// star lookups. Stars are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRecord {
    pub repo_url: String,
    pub repo_name: String,
    pub repo_id: i64,
}

impl RepoRecord {
    pub fn from_event(event: &RawEvent) -> Self {
        Self {
            repo_url: event.repo_url.clone(),
            repo_name: event.repo_name.clone(),
            repo_id: event.repo_id,
        }
    }

    /// A star lookup needs both a name and a non-zero id.
    pub fn is_enrichable(&self) -> bool {
        !self.repo_name.is_empty() && self.repo_id != 0
    }
}
