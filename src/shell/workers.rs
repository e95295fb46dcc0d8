// Background tasks of the process: the optional fetch schedule and the
// consumer loop.

use crate::modules::github_events::use_cases::consume_event::worker::ConsumerWorker;
use crate::modules::github_events::use_cases::fetch_events::handler::FetchEventsHandler;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run the producer every `interval`. A failed run is logged; the next tick polls again.
pub fn spawn_fetch_schedule(handler: Arc<FetchEventsHandler>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(error) = handler.fetch_and_dispatch().await {
                tracing::error!(%error, "scheduled fetch failed");
            }
        }
    })
}

pub fn spawn_consumer(worker: ConsumerWorker) -> JoinHandle<()> {
    tokio::spawn(worker.run())
}
