use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::routes::{db_error, ok_json};
use crate::services::study_goals::{self, GoalInput};
use crate::state::AppState;

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoalPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    target_words: i64,
    #[serde(default)]
    target_sentences: i64,
    #[serde(default)]
    target_grammar: i64,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

fn parse_date(raw: Option<&str>, field: &'static str) -> Result<NaiveDate, AppError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation(format!("{field} is required")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

impl GoalPayload {
    fn validate(self) -> Result<GoalInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        if self.target_words < 0 || self.target_sentences < 0 || self.target_grammar < 0 {
            return Err(AppError::validation("targets must not be negative"));
        }
        let start_date = parse_date(self.start_date.as_deref(), "startDate")?;
        let end_date = parse_date(self.end_date.as_deref(), "endDate")?;
        if end_date < start_date {
            return Err(AppError::validation("endDate must not precede startDate"));
        }
        Ok(GoalInput {
            title,
            description: self.description,
            target_words: self.target_words,
            target_sentences: self.target_sentences,
            target_grammar: self.target_grammar,
            start_date,
            end_date,
            is_active: self.is_active,
        })
    }
}

pub async fn list(State(state): State<AppState>) -> Response {
    match study_goals::list(state.pool()).await {
        Ok(goals) => ok_json(goals),
        Err(err) => db_error("study goals list", err),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<GoalPayload>) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match study_goals::create(state.pool(), &input).await {
        Ok(goal) => ok_json(goal),
        Err(err) => db_error("study goal create", err),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match study_goals::get(state.pool(), id).await {
        Ok(Some(goal)) => ok_json(goal),
        Ok(None) => AppError::not_found("Study goal not found").into_response(),
        Err(err) => db_error("study goal lookup", err),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GoalPayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match study_goals::update(state.pool(), id, &input).await {
        Ok(Some(goal)) => ok_json(goal),
        Ok(None) => AppError::not_found("Study goal not found").into_response(),
        Err(err) => db_error("study goal update", err),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match study_goals::delete(state.pool(), id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("Study goal not found").into_response(),
        Err(err) => db_error("study goal delete", err),
    }
}
