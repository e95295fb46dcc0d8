use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::modules::github_events::use_cases::query_aggregates::handler::{
    QueryError, ResolverRequest,
};
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct ResolveFailure {
    pub error: String,
}

fn failure(status: StatusCode, error: impl ToString) -> axum::response::Response {
    (
        status,
        Json(ResolveFailure {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<ResolverRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return failure(StatusCode::UNPROCESSABLE_ENTITY, rejection),
    };

    match state.queries.resolve(&request).await {
        Ok(result) => Json(result).into_response(),
        Err(error @ QueryError::UnknownField(_)) => failure(StatusCode::BAD_REQUEST, error),
        Err(error @ QueryError::Store(_)) => {
            tracing::error!(field = %request.field, %error, "query failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, error)
        }
    }
}
