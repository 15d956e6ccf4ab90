use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::SentenceType;
use crate::response::AppError;
use crate::routes::{db_error, ok_json};
use crate::services::sentences::{self, SentenceFilter, SentenceInput};
use crate::state::AppState;

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct TypeOption {
    value: &'static str,
    label: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SentencePayload {
    #[serde(default)]
    english: String,
    #[serde(default)]
    chinese: String,
    #[serde(default)]
    sentence_type: Option<String>,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    grammar_points: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    is_favorite: bool,
}

impl SentencePayload {
    fn validate(self) -> Result<SentenceInput, AppError> {
        let english = self.english.trim().to_string();
        if english.is_empty() {
            return Err(AppError::validation("english must not be empty"));
        }
        let chinese = self.chinese.trim().to_string();
        if chinese.is_empty() {
            return Err(AppError::validation("chinese must not be empty"));
        }
        let sentence_type = match self.sentence_type.as_deref().filter(|s| !s.is_empty()) {
            None => SentenceType::Daily,
            Some(raw) => SentenceType::parse(raw).ok_or_else(|| {
                AppError::validation(
                    "sentenceType must be one of translation, daily, business, academic, slang, quote",
                )
            })?,
        };
        Ok(SentenceInput {
            english,
            chinese,
            sentence_type,
            keywords: self.keywords,
            grammar_points: self.grammar_points,
            notes: self.notes,
            is_favorite: self.is_favorite,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    search: Option<String>,
    #[serde(rename = "type")]
    sentence_type: Option<String>,
    is_favorite: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RandomQuery {
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    #[serde(default)]
    ids: Vec<i64>,
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let sentence_type = match query.sentence_type.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match SentenceType::parse(raw) {
            Some(value) => Some(value),
            None => {
                return AppError::validation(
                    "type must be one of translation, daily, business, academic, slang, quote",
                )
                .into_response()
            }
        },
    };
    let filter = SentenceFilter {
        search: query.search,
        sentence_type,
        is_favorite: query
            .is_favorite
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.eq_ignore_ascii_case("true")),
    };

    match sentences::list(state.pool(), &filter).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("sentences list", err),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SentencePayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match sentences::create(state.pool(), &input).await {
        Ok(sentence) => ok_json(sentence),
        Err(err) => db_error("sentence create", err),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match sentences::get(state.pool(), id).await {
        Ok(Some(sentence)) => ok_json(sentence),
        Ok(None) => AppError::not_found("Sentence not found").into_response(),
        Err(err) => db_error("sentence lookup", err),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SentencePayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match sentences::update(state.pool(), id, &input).await {
        Ok(Some(sentence)) => ok_json(sentence),
        Ok(None) => AppError::not_found("Sentence not found").into_response(),
        Err(err) => db_error("sentence update", err),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match sentences::delete(state.pool(), id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("Sentence not found").into_response(),
        Err(err) => db_error("sentence delete", err),
    }
}

pub async fn review(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match sentences::review(state.pool(), id).await {
        Ok(Some(sentence)) => ok_json(serde_json::json!({ "reviewCount": sentence.review_count })),
        Ok(None) => AppError::not_found("Sentence not found").into_response(),
        Err(err) => db_error("sentence review", err),
    }
}

pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match sentences::toggle_favorite(state.pool(), id).await {
        Ok(Some(is_favorite)) => ok_json(serde_json::json!({ "isFavorite": is_favorite })),
        Ok(None) => AppError::not_found("Sentence not found").into_response(),
        Err(err) => db_error("sentence toggle favorite", err),
    }
}

pub async fn types() -> Response {
    let options: Vec<TypeOption> = SentenceType::ALL
        .iter()
        .map(|t| TypeOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();
    ok_json(options)
}

pub async fn random(State(state): State<AppState>, Query(query): Query<RandomQuery>) -> Response {
    let count = query.count.unwrap_or(1);
    match sentences::random(state.pool(), count).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("sentence random", err),
    }
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Response {
    if payload.ids.is_empty() {
        return AppError::bad_request("No IDs provided").into_response();
    }
    match sentences::delete_by_ids(state.pool(), &payload.ids).await {
        Ok(deleted) => ok_json(serde_json::json!({ "deleted": deleted })),
        Err(err) => db_error("sentence bulk delete", err),
    }
}
