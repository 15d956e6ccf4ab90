use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Row, SqliteConnection, SqlitePool};

use crate::models::LogType;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLogRecord {
    pub id: i64,
    pub log_type: String,
    pub reference_id: i64,
    pub action: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

/// Recent-activity slice used by the dashboard.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub log_type: String,
    pub action: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Clone)]
pub struct LogFilter {
    pub log_type: Option<LogType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Appends a log entry. Runs on a connection so review actions can write the
/// entry inside the same transaction as the counter update.
pub async fn insert(
    conn: &mut SqliteConnection,
    log_type: LogType,
    reference_id: i64,
    action: &str,
    notes: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now().naive_utc();
    sqlx::query(
        "INSERT INTO study_logs (log_type, reference_id, action, notes, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(log_type.as_str())
    .bind(reference_id)
    .bind(action)
    .bind(notes)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn list(pool: &SqlitePool, filter: &LogFilter) -> Result<Vec<StudyLogRecord>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, log_type, reference_id, action, notes, created_at FROM study_logs WHERE 1 = 1",
    );
    if let Some(log_type) = filter.log_type {
        qb.push(" AND log_type = ");
        qb.push_bind(log_type.as_str());
    }
    if let Some(from) = filter.from {
        qb.push(" AND date(created_at) >= ");
        qb.push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND date(created_at) <= ");
        qb.push_bind(to);
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_log_row).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<StudyLogRecord>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, log_type, reference_id, action, notes, created_at FROM study_logs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(map_log_row))
}

pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<ActivityEntry>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT log_type, action, created_at FROM study_logs \
         ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| ActivityEntry {
            log_type: row.try_get("log_type").unwrap_or_default(),
            action: row.try_get("action").unwrap_or_default(),
            created_at: row
                .try_get("created_at")
                .unwrap_or_else(|_| Utc::now().naive_utc()),
        })
        .collect())
}

/// Distinct calendar days with at least one log entry, bounded below.
pub async fn active_days_since(
    pool: &SqlitePool,
    since: NaiveDateTime,
) -> Result<HashSet<NaiveDate>, sqlx::Error> {
    let days: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT date(created_at) FROM study_logs WHERE created_at >= ?")
            .bind(since)
            .fetch_all(pool)
            .await?;
    Ok(days
        .iter()
        .filter_map(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .collect())
}

fn map_log_row(row: &sqlx::sqlite::SqliteRow) -> StudyLogRecord {
    StudyLogRecord {
        id: row.try_get("id").unwrap_or_default(),
        log_type: row.try_get("log_type").unwrap_or_default(),
        reference_id: row.try_get("reference_id").unwrap_or_default(),
        action: row.try_get("action").unwrap_or_default(),
        notes: row.try_get("notes").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    }
}
