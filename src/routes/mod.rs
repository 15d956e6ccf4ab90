mod dashboard;
mod grammar;
mod health;
mod review;
mod search;
mod sentences;
mod stats;
mod study_goals;
mod study_logs;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/words", get(words::list).post(words::create))
        .route("/api/words/categories", get(words::categories))
        .route("/api/words/random", get(words::random))
        .route("/api/words/bulk-delete", post(words::bulk_delete))
        .route(
            "/api/words/:id",
            get(words::get).put(words::update).delete(words::delete),
        )
        .route("/api/words/:id/review", post(words::review))
        .route("/api/words/:id/toggle-favorite", post(words::toggle_favorite))
        .route("/api/sentences", get(sentences::list).post(sentences::create))
        .route("/api/sentences/types", get(sentences::types))
        .route("/api/sentences/random", get(sentences::random))
        .route("/api/sentences/bulk-delete", post(sentences::bulk_delete))
        .route(
            "/api/sentences/:id",
            get(sentences::get)
                .put(sentences::update)
                .delete(sentences::delete),
        )
        .route("/api/sentences/:id/review", post(sentences::review))
        .route(
            "/api/sentences/:id/toggle-favorite",
            post(sentences::toggle_favorite),
        )
        .route("/api/grammar", get(grammar::list).post(grammar::create))
        .route("/api/grammar/categories", get(grammar::categories))
        .route("/api/grammar/bulk-delete", post(grammar::bulk_delete))
        .route(
            "/api/grammar/:id",
            get(grammar::get).put(grammar::update).delete(grammar::delete),
        )
        .route("/api/grammar/:id/review", post(grammar::review))
        .route("/api/grammar/:id/toggle-mastered", post(grammar::toggle_mastered))
        .route("/api/study-logs", get(study_logs::list))
        .route("/api/study-logs/:id", get(study_logs::get))
        .route(
            "/api/study-goals",
            get(study_goals::list).post(study_goals::create),
        )
        .route(
            "/api/study-goals/:id",
            get(study_goals::get)
                .put(study_goals::update)
                .delete(study_goals::delete),
        )
        .route("/api/dashboard", get(dashboard::snapshot))
        .route("/api/stats", get(stats::report))
        .route("/api/review", get(review::due_list))
        .route("/api/search", get(search::search))
        .route("/health", get(health::health))
        .route("/api/health", get(health::health))
        .fallback(fallback_handler)
        .with_state(state)
}

#[derive(Serialize)]
pub(crate) struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

pub(crate) fn ok_json<T: Serialize>(data: T) -> Response {
    axum::Json(SuccessResponse {
        success: true,
        data,
    })
    .into_response()
}

pub(crate) fn db_error(context: &'static str, err: sqlx::Error) -> Response {
    tracing::warn!(error = %err, context, "store query failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error",
    )
    .into_response()
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
