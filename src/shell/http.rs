use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::modules::github_events::use_cases::fetch_events::inbound::http as fetch_http;
use crate::modules::github_events::use_cases::query_aggregates::inbound::http as resolve_http;
use crate::shell::graphql::{graphiql, graphql, schema};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    let schema = schema(state.clone());
    Router::new()
        .route("/fetch", post(fetch_http::handle))
        .route("/resolve", post(resolve_http::handle))
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
