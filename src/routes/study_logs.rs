use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::LogType;
use crate::response::AppError;
use crate::routes::{db_error, ok_json};
use crate::services::study_logs::{self, LogFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(rename = "type")]
    log_type: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let log_type = match query.log_type.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match LogType::parse(raw) {
            Some(value) => Some(value),
            None => {
                return AppError::validation("type must be one of word, sentence, grammar")
                    .into_response()
            }
        },
    };
    let from = match query.from.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match parse_date(raw, "from") {
            Ok(date) => Some(date),
            Err(err) => return err.into_response(),
        },
    };
    let to = match query.to.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match parse_date(raw, "to") {
            Ok(date) => Some(date),
            Err(err) => return err.into_response(),
        },
    };
    let filter = LogFilter { log_type, from, to };

    match study_logs::list(state.pool(), &filter).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("study logs list", err),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match study_logs::get(state.pool(), id).await {
        Ok(Some(entry)) => ok_json(entry),
        Ok(None) => AppError::not_found("Study log not found").into_response(),
        Err(err) => db_error("study log lookup", err),
    }
}
