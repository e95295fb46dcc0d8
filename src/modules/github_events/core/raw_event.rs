use crate::modules::github_events::core::decode_error::DecodeError;
use serde::{Deserialize, Serialize};

/// One actor-acted-on-repo occurrence, as carried by a queue message.
///
/// The PascalCase field names are the wire contract with in-flight messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEvent {
    pub actor_login: String,
    #[serde(default)]
    pub actor_email: String,
    #[serde(default)]
    pub actor_name: String,
    pub repo_url: String,
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub repo_id: i64,
    pub event_type: String,
}

impl RawEvent {
    pub fn to_message_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode and validate a message body. Every key the consumer writes
    /// under must be non-empty.
    pub fn from_message_body(body: &str) -> Result<Self, DecodeError> {
        let event: RawEvent =
            serde_json::from_str(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        if event.actor_login.is_empty() {
            return Err(DecodeError::MissingField("ActorLogin"));
        }
        if event.repo_url.is_empty() {
            return Err(DecodeError::MissingField("RepoUrl"));
        }
        if event.event_type.is_empty() {
            return Err(DecodeError::MissingField("EventType"));
        }
        Ok(event)
    }
}
