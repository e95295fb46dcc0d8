use crate::modules::github_events::use_cases::consume_event::counter::CounterStrategy;
use crate::modules::github_events::use_cases::consume_event::handler::EventConsumer;
use crate::modules::github_events::use_cases::consume_event::worker::ConsumerWorker;
use crate::modules::github_events::use_cases::fetch_events::handler::FetchEventsHandler;
use crate::modules::github_events::use_cases::query_aggregates::handler::{
    AggregateQueries, QueryResult, ResolverRequest,
};
use crate::modules::github_events::use_cases::query_aggregates::views::{
    ActorView, EventCountView,
};
use crate::shared::core::clock::FixedClock;
use crate::shared::infrastructure::event_queue::in_memory::InMemoryQueue;
use crate::tests::fixtures::fakes::{FakeFeed, FakeMetadataSource};
use crate::tests::fixtures::raw_events::RawEventBuilder;
use crate::tests::fixtures::stores::{in_memory_store, repository_over};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn feeds_events_through_the_queue_into_the_read_path() {
    let feed = FakeFeed::with_events(vec![
        RawEventBuilder::new().build(),
        RawEventBuilder::new()
            .actor_login("bob")
            .actor_name("Bob")
            .repo_url("https://x/s")
            .repo_name("s")
            .repo_id(8)
            .event_type("WatchEvent")
            .build(),
        RawEventBuilder::new().actor_name("Alice").build(),
    ]);
    let queue = Arc::new(InMemoryQueue::new("github-events"));
    let repository = repository_over(in_memory_store());
    let producer = FetchEventsHandler::new(Arc::new(feed), queue.clone(), Duration::from_secs(1));
    let consumer = Arc::new(EventConsumer::new(
        repository.clone(),
        Arc::new(FixedClock(1_700_000_000)),
        CounterStrategy::AtomicAdd,
    ));
    let worker = ConsumerWorker::new(consumer, queue.clone(), 10, Duration::from_secs(1));
    let queries = AggregateQueries::new(
        repository,
        Arc::new(FakeMetadataSource::with_stars([(7, 3)]).failing_for([8])),
        Duration::from_secs(1),
        2,
    );

    assert_eq!(producer.fetch_and_dispatch().await.unwrap(), 3);
    let summary = worker.run_once().await.unwrap();
    assert_eq!(summary.acked, 3);
    assert_eq!(queue.in_flight_len().await, 0);

    let events = queries
        .resolve(&ResolverRequest {
            field: "Events".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        events,
        QueryResult::Events(vec![
            EventCountView {
                event_type: "PushEvent".into(),
                count: 2
            },
            EventCountView {
                event_type: "WatchEvent".into(),
                count: 1
            },
        ])
    );

    let actors = queries
        .resolve(&ResolverRequest {
            field: "Actors".into(),
        })
        .await
        .unwrap();
    let QueryResult::Actors(actors) = actors else {
        panic!("expected actors");
    };
    assert_eq!(actors.len(), 2);
    assert!(actors.contains(&ActorView {
        login: "bob".into(),
        name: "Bob".into(),
        email: String::new(),
    }));

    let repos = queries.list_repos().await.unwrap();
    let stars: Vec<(String, u64)> = repos.into_iter().map(|r| (r.repo_url, r.stars)).collect();
    assert_eq!(
        stars,
        vec![("https://x/r".to_string(), 3), ("https://x/s".to_string(), 0)]
    );
}

#[tokio::test]
async fn a_second_poll_of_the_same_page_counts_its_events_again() {
    let feed = FakeFeed::with_events(vec![RawEventBuilder::new().build()]);
    let queue = Arc::new(InMemoryQueue::new("github-events"));
    let repository = repository_over(in_memory_store());
    let producer = FetchEventsHandler::new(Arc::new(feed), queue.clone(), Duration::from_secs(1));
    let consumer = Arc::new(EventConsumer::new(
        repository.clone(),
        Arc::new(FixedClock(1)),
        CounterStrategy::ConditionalWithRetry { max_attempts: 5 },
    ));
    let worker = ConsumerWorker::new(consumer, queue, 10, Duration::from_secs(1));

    producer.fetch_and_dispatch().await.unwrap();
    producer.fetch_and_dispatch().await.unwrap();
    worker.run_once().await.unwrap();

    assert_eq!(
        repository
            .get_event_count("PushEvent")
            .await
            .unwrap()
            .map(|c| c.count),
        Some(2)
    );
}
