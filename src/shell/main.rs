use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use github_events::modules::github_events::adapters::outbound::aggregate_repository::AggregateRepository;
use github_events::modules::github_events::use_cases::consume_event::counter::CounterStrategy;
use github_events::modules::github_events::use_cases::consume_event::handler::EventConsumer;
use github_events::modules::github_events::use_cases::consume_event::worker::ConsumerWorker;
use github_events::modules::github_events::use_cases::fetch_events::handler::FetchEventsHandler;
use github_events::modules::github_events::use_cases::query_aggregates::handler::AggregateQueries;
use github_events::shared::core::clock::SystemClock;
use github_events::shared::infrastructure::aggregate_store::in_memory::InMemoryAggregateStore;
use github_events::shared::infrastructure::event_queue::in_memory::InMemoryQueue;
use github_events::shared::infrastructure::github::GitHubClient;
use github_events::shell::config::Config;
use github_events::shell::http::router;
use github_events::shell::state::AppState;
use github_events::shell::workers::{spawn_consumer, spawn_fetch_schedule};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("server stopped: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        events_count_table = %config.collections.event_counts,
        actors_table = %config.collections.actors,
        repos_table = %config.collections.repos,
        queue = %config.queue_url,
        github_api_url = %config.github_api_url,
        authenticated = config.github_token.is_some(),
        fetch_interval = ?config.fetch_interval,
        consumer_batch_size = config.consumer_batch_size,
        consumer_max_receives = config.consumer_max_receives,
        queue_visibility_timeout = ?config.queue_visibility_timeout,
        call_timeout = ?config.call_timeout,
        enrichment_concurrency = config.enrichment_concurrency,
        "configuration loaded"
    );

    let store = config
        .collections
        .key_attributes()
        .into_iter()
        .fold(InMemoryAggregateStore::new(), |store, (name, key)| {
            store.with_collection(name, key)
        });
    let queue = Arc::new(
        InMemoryQueue::new(config.queue_url.clone())
            .with_max_receives(config.consumer_max_receives)
            .with_visibility_timeout(config.queue_visibility_timeout),
    );
    let github = Arc::new(GitHubClient::new(
        &config.github_api_url,
        config.github_token.clone(),
        config.call_timeout,
    )?);
    if !github.is_authenticated() {
        tracing::warn!("no GITHUB_TOKEN set, star lookups are rate limited");
    }

    let repository = Arc::new(AggregateRepository::new(
        Arc::new(store),
        config.collections.clone(),
        config.call_timeout,
    ));
    let fetch_handler = Arc::new(FetchEventsHandler::new(
        github.clone(),
        queue.clone(),
        config.call_timeout,
    ));
    let consumer = Arc::new(EventConsumer::new(
        repository.clone(),
        Arc::new(SystemClock),
        CounterStrategy::AtomicAdd,
    ));
    let queries = Arc::new(AggregateQueries::new(
        repository,
        github,
        config.call_timeout,
        config.enrichment_concurrency,
    ));

    spawn_consumer(ConsumerWorker::new(
        consumer,
        queue,
        config.consumer_batch_size,
        config.call_timeout,
    ));
    if let Some(interval) = config.fetch_interval {
        spawn_fetch_schedule(fetch_handler.clone(), interval);
    }

    let app = router(AppState {
        fetch_handler,
        queries,
    });

    tracing::info!("GraphQL endpoint: http://{}/gql", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
