// Storage schema of the three aggregate collections.
//
// Each collection has one encode and one strict decode function. The key
// attribute is required; other attributes are optional with a default, but an
// attribute that is present with the wrong type fails the decode.

use crate::modules::github_events::core::aggregates::{ActorProfile, EventCounter, RepoRecord};
use crate::modules::github_events::core::decode_error::DecodeError;
use crate::shared::infrastructure::aggregate_store::{AttributeValue, Item};

pub mod event_counts {
    pub const KEY: &str = "EventType";
    pub const COUNT: &str = "Count";
}

pub mod actors {
    pub const KEY: &str = "Login";
    pub const NAME: &str = "ActorName";
    pub const EMAIL: &str = "Email";
    pub const LAST_ACTION: &str = "LastAction";
}

pub mod repos {
    pub const KEY: &str = "RepoUrl";
    pub const NAME: &str = "RepoName";
    pub const ID: &str = "RepoId";
}

fn required_string(item: &Item, attribute: &'static str) -> Result<String, DecodeError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) if !value.is_empty() => Ok(value.clone()),
        Some(AttributeValue::S(_)) | None => Err(DecodeError::MissingField(attribute)),
        Some(AttributeValue::N(_)) => Err(DecodeError::WrongType(attribute)),
    }
}

fn optional_string(item: &Item, attribute: &'static str) -> Result<String, DecodeError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        None => Ok(String::new()),
        Some(AttributeValue::N(_)) => Err(DecodeError::WrongType(attribute)),
    }
}

fn optional_number(item: &Item, attribute: &'static str) -> Result<i64, DecodeError> {
    match item.get(attribute) {
        Some(AttributeValue::N(value)) => Ok(*value),
        None => Ok(0),
        Some(AttributeValue::S(_)) => Err(DecodeError::WrongType(attribute)),
    }
}

pub fn decode_event_counter(item: &Item) -> Result<EventCounter, DecodeError> {
    let event_type = required_string(item, event_counts::KEY)?;
    let count = match item.get(event_counts::COUNT) {
        Some(AttributeValue::N(value)) => *value,
        Some(AttributeValue::S(_)) => return Err(DecodeError::WrongType(event_counts::COUNT)),
        None => return Err(DecodeError::MissingField(event_counts::COUNT)),
    };
    let count = u64::try_from(count).map_err(|_| DecodeError::OutOfRange {
        field: event_counts::COUNT,
        value: count,
    })?;
    Ok(EventCounter { event_type, count })
}

pub fn decode_actor_profile(item: &Item) -> Result<ActorProfile, DecodeError> {
    Ok(ActorProfile {
        login: required_string(item, actors::KEY)?,
        name: optional_string(item, actors::NAME)?,
        email: optional_string(item, actors::EMAIL)?,
        last_action_timestamp: optional_number(item, actors::LAST_ACTION)?,
    })
}

pub fn decode_repo_record(item: &Item) -> Result<RepoRecord, DecodeError> {
    Ok(RepoRecord {
        repo_url: required_string(item, repos::KEY)?,
        repo_name: optional_string(item, repos::NAME)?,
        repo_id: optional_number(item, repos::ID)?,
    })
}

/// Attributes overwritten by an actor upsert. The key is set by the store.
pub fn encode_actor_profile(profile: &ActorProfile) -> Item {
    Item::from([
        (actors::NAME.to_string(), AttributeValue::from(profile.name.as_str())),
        (actors::EMAIL.to_string(), AttributeValue::from(profile.email.as_str())),
        (
            actors::LAST_ACTION.to_string(),
            AttributeValue::N(profile.last_action_timestamp),
        ),
    ])
}

/// Attributes overwritten by a repo upsert. The key is set by the store.
pub fn encode_repo_record(record: &RepoRecord) -> Item {
    Item::from([
        (repos::NAME.to_string(), AttributeValue::from(record.repo_name.as_str())),
        (repos::ID.to_string(), AttributeValue::N(record.repo_id)),
    ])
}
