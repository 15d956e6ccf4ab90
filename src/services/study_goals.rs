use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

const ALL_COLUMNS: &str = "id, title, description, target_words, target_sentences, \
                           target_grammar, start_date, end_date, is_active, created_at";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub target_words: i64,
    pub target_sentences: i64,
    pub target_grammar: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    /// Derived on read, never stored.
    pub progress: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GoalInput {
    pub title: String,
    pub description: String,
    pub target_words: i64,
    pub target_sentences: i64,
    pub target_grammar: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
}

/// Calendar-day completion fraction: elapsed days over total days, clamped to
/// 0..100 and rounded to one decimal. Inactive goals report no progress; a
/// non-positive window counts as done.
pub fn progress_percent(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    is_active: bool,
) -> Option<f64> {
    if !is_active {
        return None;
    }
    let total_days = (end - start).num_days();
    if total_days <= 0 {
        return Some(100.0);
    }
    let passed_days = (today - start).num_days();
    let progress = ((passed_days as f64 / total_days as f64) * 100.0).clamp(0.0, 100.0);
    Some((progress * 10.0).round() / 10.0)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<GoalRecord>, sqlx::Error> {
    let sql = format!("SELECT {ALL_COLUMNS} FROM study_goals ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    let today = Utc::now().date_naive();
    Ok(rows.iter().map(|row| map_goal_row(row, today)).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<GoalRecord>, sqlx::Error> {
    let sql = format!("SELECT {ALL_COLUMNS} FROM study_goals WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    let today = Utc::now().date_naive();
    Ok(row.as_ref().map(|row| map_goal_row(row, today)))
}

pub async fn create(pool: &SqlitePool, input: &GoalInput) -> Result<GoalRecord, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO study_goals \
           (title, description, target_words, target_sentences, target_grammar, \
            start_date, end_date, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.target_words)
    .bind(input.target_sentences)
    .bind(input.target_grammar)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.is_active)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid())
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &GoalInput,
) -> Result<Option<GoalRecord>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE study_goals SET title = ?, description = ?, target_words = ?, \
           target_sentences = ?, target_grammar = ?, start_date = ?, end_date = ?, \
           is_active = ? \
         WHERE id = ?",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.target_words)
    .bind(input.target_sentences)
    .bind(input.target_grammar)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_goals WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_goal_row(row: &sqlx::sqlite::SqliteRow, today: NaiveDate) -> GoalRecord {
    let start_date: NaiveDate = row
        .try_get("start_date")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let end_date: NaiveDate = row
        .try_get("end_date")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let is_active: bool = row.try_get("is_active").unwrap_or(false);
    GoalRecord {
        id: row.try_get("id").unwrap_or_default(),
        title: row.try_get("title").unwrap_or_default(),
        description: row.try_get("description").unwrap_or_default(),
        target_words: row.try_get("target_words").unwrap_or_default(),
        target_sentences: row.try_get("target_sentences").unwrap_or_default(),
        target_grammar: row.try_get("target_grammar").unwrap_or_default(),
        start_date,
        end_date,
        is_active,
        created_at: row
            .try_get("created_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
        progress: progress_percent(start_date, end_date, today, is_active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inactive_goal_has_no_progress() {
        assert_eq!(
            progress_percent(date(2026, 1, 1), date(2026, 1, 31), date(2026, 1, 15), false),
            None
        );
    }

    #[test]
    fn non_positive_window_is_complete() {
        assert_eq!(
            progress_percent(date(2026, 1, 10), date(2026, 1, 10), date(2026, 1, 5), true),
            Some(100.0)
        );
        assert_eq!(
            progress_percent(date(2026, 1, 10), date(2026, 1, 5), date(2026, 1, 5), true),
            Some(100.0)
        );
    }

    #[test]
    fn progress_is_clamped_and_rounded() {
        // Halfway through a 30-day window.
        assert_eq!(
            progress_percent(date(2026, 1, 1), date(2026, 1, 31), date(2026, 1, 16), true),
            Some(50.0)
        );
        // Before the window starts.
        assert_eq!(
            progress_percent(date(2026, 2, 1), date(2026, 2, 28), date(2026, 1, 1), true),
            Some(0.0)
        );
        // After the window ends.
        assert_eq!(
            progress_percent(date(2026, 1, 1), date(2026, 1, 31), date(2026, 3, 1), true),
            Some(100.0)
        );
        // One third of a 3-day window, rounded to one decimal.
        assert_eq!(
            progress_percent(date(2026, 1, 1), date(2026, 1, 4), date(2026, 1, 2), true),
            Some(33.3)
        );
    }
}
