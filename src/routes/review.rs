use axum::extract::State;
use axum::response::Response;

use crate::routes::{db_error, ok_json};
use crate::services::review_queue::{self, ReviewPolicy};
use crate::state::AppState;

pub async fn due_list(State(state): State<AppState>) -> Response {
    let policy = ReviewPolicy::default();
    match review_queue::due_items(state.pool(), &policy).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("review queue", err),
    }
}
