use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct FetchEventsResponse {
    pub sent: usize,
}

#[derive(Serialize)]
pub struct FetchEventsFailure {
    pub error: String,
}

/// Trigger for an external scheduler.
pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    match state.fetch_handler.fetch_and_dispatch().await {
        Ok(sent) => (StatusCode::OK, Json(FetchEventsResponse { sent })).into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(FetchEventsFailure {
                error: error.to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod fetch_events_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::shared::infrastructure::event_queue::in_memory::InMemoryQueue;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::fakes::FakeFeed;
    use crate::tests::fixtures::raw_events::RawEventBuilder;
    use crate::tests::fixtures::state::make_test_state;

    use super::handle;

    fn app(state: AppState) -> Router {
        Router::new().route("/fetch", post(handle)).with_state(state)
    }

    #[tokio::test]
    async fn it_should_return_200_with_the_number_of_sent_messages() {
        let feed = FakeFeed::with_events(vec![RawEventBuilder::new().build()]);
        let queue = Arc::new(InMemoryQueue::new("github-events"));
        let state = make_test_state(feed, queue.clone());

        let response = app(state)
            .oneshot(Request::post("/fetch").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"sent": 1}));
        assert_eq!(queue.ready_len().await, 1);
    }

    #[tokio::test]
    async fn it_should_return_502_when_the_feed_is_offline() {
        let mut feed = FakeFeed::with_events(vec![]);
        feed.toggle_offline();
        let state = make_test_state(feed, Arc::new(InMemoryQueue::new("github-events")));

        let response = app(state)
            .oneshot(Request::post("/fetch").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["error"].as_str().unwrap().contains("feed"));
    }
}
