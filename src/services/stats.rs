use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

const SERIES_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub word_by_difficulty: Vec<BreakdownEntry>,
    pub sentence_by_type: Vec<BreakdownEntry>,
    pub grammar_by_difficulty: Vec<BreakdownEntry>,
    pub last_7_days: Vec<DailyEntry>,
}

/// One group-by bucket; only groups with at least one member appear.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub words: i64,
    pub sentences: i64,
    pub grammar: i64,
}

/// Today and the six preceding days, oldest first.
pub fn seven_day_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..SERIES_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

pub async fn report(pool: &SqlitePool) -> Result<StatsReport, sqlx::Error> {
    let (word_by_difficulty, sentence_by_type, grammar_by_difficulty) = tokio::try_join!(
        breakdown(pool, "words", "difficulty"),
        breakdown(pool, "sentences", "sentence_type"),
        breakdown(pool, "grammar_points", "difficulty"),
    )?;

    let today = Utc::now().date_naive();
    let window = seven_day_window(today);
    let since = window[0];

    let (words, sentences, grammar) = tokio::try_join!(
        daily_counts(pool, "words", since),
        daily_counts(pool, "sentences", since),
        daily_counts(pool, "grammar_points", since),
    )?;

    let last_7_days = window
        .iter()
        .map(|day| {
            let key = day.format("%Y-%m-%d").to_string();
            DailyEntry {
                date: day.format("%m-%d").to_string(),
                words: words.get(&key).copied().unwrap_or(0),
                sentences: sentences.get(&key).copied().unwrap_or(0),
                grammar: grammar.get(&key).copied().unwrap_or(0),
            }
        })
        .collect();

    Ok(StatsReport {
        word_by_difficulty,
        sentence_by_type,
        grammar_by_difficulty,
        last_7_days,
    })
}

async fn breakdown(
    pool: &SqlitePool,
    table: &str,
    column: &str,
) -> Result<Vec<BreakdownEntry>, sqlx::Error> {
    let sql = format!(
        "SELECT {column} AS key, COUNT(*) AS count FROM {table} GROUP BY {column} ORDER BY {column}"
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| BreakdownEntry {
            key: row.try_get("key").unwrap_or_default(),
            count: row.try_get("count").unwrap_or_default(),
        })
        .collect())
}

async fn daily_counts(
    pool: &SqlitePool,
    table: &str,
    since: NaiveDate,
) -> Result<HashMap<String, i64>, sqlx::Error> {
    let sql = format!(
        "SELECT date(created_at) AS day, COUNT(*) AS count FROM {table} \
         WHERE date(created_at) >= ? GROUP BY day"
    );
    let rows = sqlx::query(&sql).bind(since).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let day: String = row.try_get("day").ok()?;
            let count: i64 = row.try_get("count").ok()?;
            Some((day, count))
        })
        .collect())
}
