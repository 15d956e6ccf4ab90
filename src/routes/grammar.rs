use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::GrammarLevel;
use crate::response::AppError;
use crate::routes::{db_error, ok_json};
use crate::services::grammar::{self, GrammarFilter, GrammarInput};
use crate::state::AppState;

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GrammarPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    structure: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    usage: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    common_mistakes: String,
    #[serde(default)]
    tips: String,
    #[serde(default)]
    is_mastered: bool,
}

impl GrammarPayload {
    fn validate(self) -> Result<GrammarInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        let structure = self.structure.trim().to_string();
        if structure.is_empty() {
            return Err(AppError::validation("structure must not be empty"));
        }
        let explanation = self.explanation.trim().to_string();
        if explanation.is_empty() {
            return Err(AppError::validation("explanation must not be empty"));
        }
        let difficulty = match self.difficulty.as_deref().filter(|s| !s.is_empty()) {
            None => GrammarLevel::Intermediate,
            Some(raw) => GrammarLevel::parse(raw).ok_or_else(|| {
                AppError::validation("difficulty must be one of beginner, intermediate, advanced")
            })?,
        };
        Ok(GrammarInput {
            title,
            structure,
            explanation,
            usage: self.usage,
            examples: self.examples,
            difficulty,
            category: self.category,
            common_mistakes: self.common_mistakes,
            tips: self.tips,
            is_mastered: self.is_mastered,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    search: Option<String>,
    difficulty: Option<String>,
    category: Option<String>,
    is_mastered: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    #[serde(default)]
    ids: Vec<i64>,
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let difficulty = match query.difficulty.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match GrammarLevel::parse(raw) {
            Some(value) => Some(value),
            None => {
                return AppError::validation(
                    "difficulty must be one of beginner, intermediate, advanced",
                )
                .into_response()
            }
        },
    };
    let filter = GrammarFilter {
        search: query.search,
        difficulty,
        category: query.category,
        is_mastered: query
            .is_mastered
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.eq_ignore_ascii_case("true")),
    };

    match grammar::list(state.pool(), &filter).await {
        Ok(items) => ok_json(items),
        Err(err) => db_error("grammar list", err),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GrammarPayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match grammar::create(state.pool(), &input).await {
        Ok(point) => ok_json(point),
        Err(err) => db_error("grammar create", err),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match grammar::get(state.pool(), id).await {
        Ok(Some(point)) => ok_json(point),
        Ok(None) => AppError::not_found("Grammar point not found").into_response(),
        Err(err) => db_error("grammar lookup", err),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GrammarPayload>,
) -> Response {
    let input = match payload.validate() {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match grammar::update(state.pool(), id, &input).await {
        Ok(Some(point)) => ok_json(point),
        Ok(None) => AppError::not_found("Grammar point not found").into_response(),
        Err(err) => db_error("grammar update", err),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match grammar::delete(state.pool(), id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("Grammar point not found").into_response(),
        Err(err) => db_error("grammar delete", err),
    }
}

pub async fn review(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match grammar::review(state.pool(), id).await {
        Ok(Some(point)) => ok_json(serde_json::json!({ "reviewCount": point.review_count })),
        Ok(None) => AppError::not_found("Grammar point not found").into_response(),
        Err(err) => db_error("grammar review", err),
    }
}

pub async fn toggle_mastered(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match grammar::toggle_mastered(state.pool(), id).await {
        Ok(Some(is_mastered)) => ok_json(serde_json::json!({ "isMastered": is_mastered })),
        Ok(None) => AppError::not_found("Grammar point not found").into_response(),
        Err(err) => db_error("grammar toggle mastered", err),
    }
}

pub async fn categories(State(state): State<AppState>) -> Response {
    match grammar::categories(state.pool()).await {
        Ok(categories) => ok_json(categories),
        Err(err) => db_error("grammar categories", err),
    }
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Response {
    if payload.ids.is_empty() {
        return AppError::bad_request("No IDs provided").into_response();
    }
    match grammar::delete_by_ids(state.pool(), &payload.ids).await {
        Ok(deleted) => ok_json(serde_json::json!({ "deleted": deleted })),
        Err(err) => db_error("grammar bulk delete", err),
    }
}
