// Producer: one page of the feed in, one queue message per event out.
//
// A failed send aborts the run. Events after the failed one are not sent;
// the next run polls the feed again.

use crate::modules::github_events::use_cases::fetch_events::feed_port::{EventFeed, FeedError};
use crate::shared::infrastructure::event_queue::{QueueError, QueueSender};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetching the event feed failed: {0}")]
    Feed(#[from] FeedError),

    #[error("encoding an event failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("sending to the queue failed after {sent} messages: {source}")]
    Send { sent: usize, source: QueueError },
}

pub struct FetchEventsHandler {
    feed: Arc<dyn EventFeed>,
    sender: Arc<dyn QueueSender>,
    call_timeout: Duration,
}

impl FetchEventsHandler {
    pub fn new(feed: Arc<dyn EventFeed>, sender: Arc<dyn QueueSender>, call_timeout: Duration) -> Self {
        Self {
            feed,
            sender,
            call_timeout,
        }
    }

    /// Returns the number of messages sent.
    pub async fn fetch_and_dispatch(&self) -> Result<usize, FetchError> {
        let events = tokio::time::timeout(self.call_timeout, self.feed.fetch_page())
            .await
            .map_err(|_| FeedError::Timeout)??;
        tracing::debug!(fetched = events.len(), "fetched event feed page");

        let mut sent = 0;
        for event in &events {
            let body = event.to_message_body()?;
            let result = tokio::time::timeout(self.call_timeout, self.sender.send(body))
                .await
                .unwrap_or(Err(QueueError::Timeout(self.call_timeout)));
            match result {
                Ok(message_id) => {
                    tracing::debug!(%message_id, event_type = %event.event_type, "event queued");
                    sent += 1;
                }
                Err(source) => {
                    tracing::error!(sent, remaining = events.len() - sent, error = %source, "aborting dispatch");
                    return Err(FetchError::Send { sent, source });
                }
            }
        }

        tracing::info!(fetched = events.len(), sent, "event feed page dispatched");
        Ok(sent)
    }
}

#[cfg(test)]
mod fetch_events_handler_tests {
    use super::*;
    use crate::modules::github_events::core::raw_event::RawEvent;
    use crate::shared::infrastructure::event_queue::QueueReceiver;
    use crate::shared::infrastructure::event_queue::in_memory::InMemoryQueue;
    use crate::tests::fixtures::fakes::FakeFeed;
    use crate::tests::fixtures::raw_events::RawEventBuilder;
    use rstest::{fixture, rstest};

    fn three_events() -> Vec<RawEvent> {
        ["PushEvent", "WatchEvent", "ForkEvent"]
            .into_iter()
            .map(|event_type| RawEventBuilder::new().event_type(event_type).build())
            .collect()
    }

    #[fixture]
    fn before_each() -> Arc<InMemoryQueue> {
        Arc::new(InMemoryQueue::new("github-events"))
    }

    fn handler(feed: FakeFeed, queue: Arc<InMemoryQueue>) -> FetchEventsHandler {
        FetchEventsHandler::new(Arc::new(feed), queue, Duration::from_secs(1))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_send_one_message_per_event(before_each: Arc<InMemoryQueue>) {
        let queue = before_each;
        let sent = handler(FakeFeed::with_events(three_events()), queue.clone())
            .fetch_and_dispatch()
            .await
            .unwrap();

        assert_eq!(sent, 3);
        let messages = queue.receive(10).await.unwrap();
        let types: Vec<String> = messages
            .iter()
            .map(|m| RawEvent::from_message_body(&m.body).unwrap().event_type)
            .collect();
        assert_eq!(types, vec!["PushEvent", "WatchEvent", "ForkEvent"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_send_nothing_for_an_empty_page(before_each: Arc<InMemoryQueue>) {
        let queue = before_each;
        let sent = handler(FakeFeed::with_events(vec![]), queue.clone())
            .fetch_and_dispatch()
            .await
            .unwrap();
        assert_eq!(sent, 0);
        assert_eq!(queue.ready_len().await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_abort_on_the_first_failed_send(before_each: Arc<InMemoryQueue>) {
        let queue = before_each;
        queue.fail_sends_after(1).await;
        let result = handler(FakeFeed::with_events(three_events()), queue.clone())
            .fetch_and_dispatch()
            .await;

        assert!(matches!(result, Err(FetchError::Send { sent: 1, .. })));
        assert_eq!(queue.ready_len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_feed_failure_without_sending(before_each: Arc<InMemoryQueue>) {
        let queue = before_each;
        let mut feed = FakeFeed::with_events(three_events());
        feed.toggle_offline();
        let result = handler(feed, queue.clone()).fetch_and_dispatch().await;

        assert!(matches!(result, Err(FetchError::Feed(FeedError::Unavailable(_)))));
        assert_eq!(queue.ready_len().await, 0);
    }
}
