use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Difficulty;
use crate::response::AppError;
use crate::routes::{db_error, ok_json};
use crate::services::words::{self, WordFilter, WordInput};
use crate::state::AppState;

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WordPayload {
    #[serde(default)]
    word: String,
    #[serde(default)]
    phonetic: String,
    #[serde(default)]
    meaning: String,
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    example_sentence: String,
    #[serde(default)]
    example_translation: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    is_favorite: bool,
}

impl WordPayload {
    fn validate(self) -> Result<WordInput, AppError> {
        let word = self.word.trim().to_string();
        if word.is_empty() {
            return Err(AppError::validation("word must not be empty"));
        }
        let meaning = self.meaning.trim().to_string();
        if meaning.is_empty() {
            return Err(AppError::validation("meaning must not be empty"));
        }
        let difficulty = match self.difficulty.as_deref().filter(|s| !s.is_empty()) {
            None => Difficulty::Medium,
            Some(raw) => Difficulty::parse(raw)
                .ok_or_else(|| AppError::validation("difficulty must be one of easy, medium, hard"))?,
        };
        Ok(WordInput {
            word,
            phonetic: self.phonetic,
            meaning,
            part_of_speech: self.part_of_speech,
            example_sentence: self.example_sentence,
            example_translation: self.example_translation,
            difficulty,
            category: self.category,
            notes: self.notes,
            is_favorite: self.is_favorite,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    search: Option<String>,
    difficulty: Option<String>,
    is_favorite: Option<String>,
    category: Option<String>,
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
    let difficulty = match query.difficulty.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match Difficulty::parse(raw) {
            Some(value) => Some(value),
            None => {
                return AppError::validation("difficulty must be one of easy, medium, hard")
                    .into_response()
            }
        },
    };
    let filter = WordFilter {
        search: query.search,
        difficulty,
        is_favorite: query
            .is_favorite
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.eq_ignore_ascii_case("true")),
        category: query.category,
    };

    match words::list(state.pool(), &filter).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("words list", err),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<WordPayload>) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match words::create(state.pool(), &input).await {
        Ok(word) => ok_json(word),
        Err(err) => db_error("word create", err),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match words::get(state.pool(), id).await {
        Ok(Some(word)) => ok_json(word),
        Ok(None) => AppError::not_found("Word not found").into_response(),
        Err(err) => db_error("word lookup", err),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<WordPayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match words::update(state.pool(), id, &input).await {
        Ok(Some(word)) => ok_json(word),
        Ok(None) => AppError::not_found("Word not found").into_response(),
        Err(err) => db_error("word update", err),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match words::delete(state.pool(), id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("Word not found").into_response(),
        Err(err) => db_error("word delete", err),
    }
}

pub async fn review(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match words::review(state.pool(), id).await {
        Ok(Some(word)) => ok_json(serde_json::json!({ "reviewCount": word.review_count })),
        Ok(None) => AppError::not_found("Word not found").into_response(),
        Err(err) => db_error("word review", err),
    }
}

pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match words::toggle_favorite(state.pool(), id).await {
        Ok(Some(is_favorite)) => ok_json(serde_json::json!({ "isFavorite": is_favorite })),
        Ok(None) => AppError::not_found("Word not found").into_response(),
        Err(err) => db_error("word toggle favorite", err),
    }
}

pub async fn categories(State(state): State<AppState>) -> Response {
    match words::categories(state.pool()).await {
        Ok(categories) => ok_json(categories),
        Err(err) => db_error("word categories", err),
    }
}

pub async fn random(State(state): State<AppState>, Query(query): Query<RandomQuery>) -> Response {
    let count = query.count.unwrap_or(1);
    match words::random(state.pool(), count).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("word random", err),
    }
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Response {
    if payload.ids.is_empty() {
        return AppError::bad_request("No IDs provided").into_response();
    }
    match words::delete_by_ids(state.pool(), &payload.ids).await {
        Ok(deleted) => ok_json(serde_json::json!({ "deleted": deleted })),
        Err(err) => db_error("word bulk delete", err),
    }
}
