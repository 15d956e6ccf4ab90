use axum::extract::State;
use axum::response::Response;

use crate::routes::{db_error, ok_json};
use crate::services::dashboard;
use crate::state::AppState;

pub async fn snapshot(State(state): State<AppState>) -> Response {
    match dashboard::snapshot(state.pool()).await {
        Ok(snapshot) => ok_json(snapshot),
        Err(err) => db_error("dashboard snapshot", err),
    }
}
