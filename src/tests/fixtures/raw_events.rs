// Builder for RawEvent, seeded from the JSON queue body in `json/raw_event.json`.

use crate::modules::github_events::core::raw_event::RawEvent;
use crate::shared::infrastructure::event_queue::QueueMessage;
use uuid::Uuid;

const RAW_EVENT_JSON: &str = include_str!("json/raw_event.json");

pub struct RawEventBuilder {
    inner: RawEvent,
}

impl Default for RawEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RawEventBuilder {
    pub fn new() -> Self {
        Self {
            inner: RawEvent::from_message_body(RAW_EVENT_JSON).unwrap(),
        }
    }

    pub fn actor_login(mut self, v: impl Into<String>) -> Self {
        self.inner.actor_login = v.into();
        self
    }

    pub fn actor_email(mut self, v: impl Into<String>) -> Self {
        self.inner.actor_email = v.into();
        self
    }

    pub fn actor_name(mut self, v: impl Into<String>) -> Self {
        self.inner.actor_name = v.into();
        self
    }

    pub fn repo_url(mut self, v: impl Into<String>) -> Self {
        self.inner.repo_url = v.into();
        self
    }

    pub fn repo_name(mut self, v: impl Into<String>) -> Self {
        self.inner.repo_name = v.into();
        self
    }

    pub fn repo_id(mut self, v: i64) -> Self {
        self.inner.repo_id = v;
        self
    }

    pub fn event_type(mut self, v: impl Into<String>) -> Self {
        self.inner.event_type = v.into();
        self
    }

    pub fn build(self) -> RawEvent {
        self.inner
    }
}

/// A first delivery of `event`, as the queue would hand it to the consumer.
pub fn message_for(event: &RawEvent) -> QueueMessage {
    QueueMessage {
        message_id: Uuid::now_v7().to_string(),
        receipt: Uuid::now_v7().to_string(),
        body: event.to_message_body().unwrap(),
        receive_count: 1,
    }
}
