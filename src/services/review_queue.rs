use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::services::truncate_chars;

/// Due-selection thresholds, held as data so they stay visible and
/// adjustable in one place.
#[derive(Debug, Clone)]
pub struct ReviewPolicy {
    pub word_stale_days: i64,
    pub word_min_reviews: i64,
    pub sentence_stale_days: i64,
    pub sentence_min_reviews: i64,
    pub grammar_stale_days: i64,
    pub per_type_limit: i64,
    pub merged_limit: usize,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            word_stale_days: 7,
            word_min_reviews: 5,
            sentence_stale_days: 7,
            sentence_min_reviews: 3,
            grammar_stale_days: 10,
            per_type_limit: 20,
            merged_limit: 50,
        }
    }
}

const SENTENCE_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: &'static str,
    pub title: String,
    pub content: String,
    pub last_reviewed: Option<NaiveDateTime>,
    pub review_count: i64,
}

/// Ranks candidates by urgency: never-reviewed first, then oldest review
/// first. The sort is stable, so ties keep their per-type selection order.
pub fn merge_and_rank(mut items: Vec<ReviewItem>, limit: usize) -> Vec<ReviewItem> {
    items.sort_by_key(|item| item.last_reviewed);
    items.truncate(limit);
    items
}

pub async fn due_items(
    pool: &SqlitePool,
    policy: &ReviewPolicy,
) -> Result<Vec<ReviewItem>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let mut items = Vec::new();

    let word_cutoff = now - Duration::days(policy.word_stale_days);
    let rows = sqlx::query(
        "SELECT id, word, meaning, last_reviewed, review_count FROM words \
         WHERE last_reviewed IS NULL OR last_reviewed < ? OR review_count < ? \
         ORDER BY id LIMIT ?",
    )
    .bind(word_cutoff)
    .bind(policy.word_min_reviews)
    .bind(policy.per_type_limit)
    .fetch_all(pool)
    .await?;
    for row in rows {
        items.push(ReviewItem {
            id: row.try_get("id").unwrap_or_default(),
            item_type: "word",
            title: row.try_get("word").unwrap_or_default(),
            content: row.try_get("meaning").unwrap_or_default(),
            last_reviewed: row
                .try_get::<Option<NaiveDateTime>, _>("last_reviewed")
                .ok()
                .flatten(),
            review_count: row.try_get("review_count").unwrap_or_default(),
        });
    }

    let sentence_cutoff = now - Duration::days(policy.sentence_stale_days);
    let rows = sqlx::query(
        "SELECT id, english, chinese, last_reviewed, review_count FROM sentences \
         WHERE last_reviewed IS NULL OR last_reviewed < ? OR review_count < ? \
         ORDER BY id LIMIT ?",
    )
    .bind(sentence_cutoff)
    .bind(policy.sentence_min_reviews)
    .bind(policy.per_type_limit)
    .fetch_all(pool)
    .await?;
    for row in rows {
        let english: String = row.try_get("english").unwrap_or_default();
        items.push(ReviewItem {
            id: row.try_get("id").unwrap_or_default(),
            item_type: "sentence",
            title: truncate_chars(&english, SENTENCE_TITLE_CHARS),
            content: row.try_get("chinese").unwrap_or_default(),
            last_reviewed: row
                .try_get::<Option<NaiveDateTime>, _>("last_reviewed")
                .ok()
                .flatten(),
            review_count: row.try_get("review_count").unwrap_or_default(),
        });
    }

    let grammar_cutoff = now - Duration::days(policy.grammar_stale_days);
    let rows = sqlx::query(
        "SELECT id, title, structure, last_reviewed, review_count FROM grammar_points \
         WHERE is_mastered = 0 OR last_reviewed IS NULL OR last_reviewed < ? \
         ORDER BY id LIMIT ?",
    )
    .bind(grammar_cutoff)
    .bind(policy.per_type_limit)
    .fetch_all(pool)
    .await?;
    for row in rows {
        items.push(ReviewItem {
            id: row.try_get("id").unwrap_or_default(),
            item_type: "grammar",
            title: row.try_get("title").unwrap_or_default(),
            content: row.try_get("structure").unwrap_or_default(),
            last_reviewed: row
                .try_get::<Option<NaiveDateTime>, _>("last_reviewed")
                .ok()
                .flatten(),
            review_count: row.try_get("review_count").unwrap_or_default(),
        });
    }

    Ok(merge_and_rank(items, policy.merged_limit))
}
