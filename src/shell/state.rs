use crate::modules::github_events::use_cases::fetch_events::handler::FetchEventsHandler;
use crate::modules::github_events::use_cases::query_aggregates::handler::AggregateQueries;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub fetch_handler: Arc<FetchEventsHandler>,
    pub queries: Arc<AggregateQueries>,
}
