use crate::modules::github_events::core::aggregates::{ActorProfile, EventCounter, RepoRecord};
use serde::{Deserialize, Serialize};

/// A repo record with its read-time star count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoView {
    #[serde(rename = "repoURL")]
    pub repo_url: String,
    #[serde(rename = "repoName")]
    pub repo_name: String,
    #[serde(rename = "repoId")]
    pub repo_id: i64,
    pub stars: u64,
}

impl RepoView {
    pub fn new(record: RepoRecord, stars: u64) -> Self {
        Self {
            repo_url: record.repo_url,
            repo_name: record.repo_name,
            repo_id: record.repo_id,
            stars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorView {
    pub login: String,
    pub name: String,
    pub email: String,
}

impl From<ActorProfile> for ActorView {
    fn from(profile: ActorProfile) -> Self {
        Self {
            login: profile.login,
            name: profile.name,
            email: profile.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCountView {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: u64,
}

impl From<EventCounter> for EventCountView {
    fn from(counter: EventCounter) -> Self {
        Self {
            event_type: counter.event_type,
            count: counter.count,
        }
    }
}

#[cfg(test)]
mod views_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_serialize_a_repo_with_the_read_path_field_names() {
        let view = RepoView::new(
            RepoRecord {
                repo_url: "https://x/r".into(),
                repo_name: "r".into(),
                repo_id: 7,
            },
            42,
        );
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"repoURL": "https://x/r", "repoName": "r", "repoId": 7, "stars": 42})
        );
    }

    #[rstest]
    fn it_should_serialize_an_event_count_under_type() {
        let view = EventCountView::from(EventCounter {
            event_type: "PushEvent".into(),
            count: 3,
        });
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"type": "PushEvent", "count": 3})
        );
    }
}
