use axum::extract::State;
use axum::response::Response;

use crate::routes::{db_error, ok_json};
use crate::services::stats;
use crate::state::AppState;

pub async fn report(State(state): State<AppState>) -> Response {
    match stats::report(state.pool()).await {
        Ok(report) => ok_json(report),
        Err(err) => db_error("stats report", err),
    }
}
