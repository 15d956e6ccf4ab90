use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::services::{streak, study_logs};

const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_words: i64,
    pub total_sentences: i64,
    pub total_grammar: i64,
    pub today_words: i64,
    pub today_sentences: i64,
    pub today_grammar: i64,
    pub favorite_words: i64,
    pub favorite_sentences: i64,
    pub mastered_grammar: i64,
    pub recent_activities: Vec<ActivityView>,
    pub study_streak: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    #[serde(rename = "type")]
    pub log_type: String,
    pub action: String,
    pub time: String,
}

/// Point-in-time snapshot; every call recomputes from the store.
pub async fn snapshot(pool: &SqlitePool) -> Result<DashboardSnapshot, sqlx::Error> {
    let today = Utc::now().date_naive();

    let (total_words, total_sentences, total_grammar) = tokio::try_join!(
        count(pool, "SELECT COUNT(*) FROM words"),
        count(pool, "SELECT COUNT(*) FROM sentences"),
        count(pool, "SELECT COUNT(*) FROM grammar_points"),
    )?;

    let (today_words, today_sentences, today_grammar) = tokio::try_join!(
        count_created_on(pool, "words", today),
        count_created_on(pool, "sentences", today),
        count_created_on(pool, "grammar_points", today),
    )?;

    let (favorite_words, favorite_sentences, mastered_grammar) = tokio::try_join!(
        count(pool, "SELECT COUNT(*) FROM words WHERE is_favorite = 1"),
        count(pool, "SELECT COUNT(*) FROM sentences WHERE is_favorite = 1"),
        count(pool, "SELECT COUNT(*) FROM grammar_points WHERE is_mastered = 1"),
    )?;

    let recent_activities = study_logs::recent(pool, RECENT_ACTIVITY_LIMIT)
        .await?
        .into_iter()
        .map(|entry| ActivityView {
            log_type: entry.log_type,
            action: entry.action,
            time: entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let study_streak = streak::current_streak(pool).await?;

    Ok(DashboardSnapshot {
        total_words,
        total_sentences,
        total_grammar,
        today_words,
        today_sentences,
        today_grammar,
        favorite_words,
        favorite_sentences,
        mastered_grammar,
        recent_activities,
        study_streak,
    })
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(pool).await
}

async fn count_created_on(
    pool: &SqlitePool,
    table: &str,
    day: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE date(created_at) = ?");
    sqlx::query_scalar(&sql).bind(day).fetch_one(pool).await
}
