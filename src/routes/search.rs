use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::routes::{db_error, ok_json};
use crate::services::search::search_all;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let q = query.q.unwrap_or_default();
    match search_all(state.pool(), &q).await {
        Ok(results) => ok_json(results),
        Err(err) => db_error("search", err),
    }
}
