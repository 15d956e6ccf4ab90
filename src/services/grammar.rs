use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Row, SqlitePool};

use crate::models::{GrammarLevel, LogType, Reviewable};
use crate::services::{escape_like, study_logs};

const ALL_COLUMNS: &str = "id, title, structure, explanation, usage, examples, difficulty, \
                           category, common_mistakes, tips, is_mastered, review_count, \
                           last_reviewed, created_at, updated_at";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarRecord {
    pub id: i64,
    pub title: String,
    pub structure: String,
    pub explanation: String,
    pub usage: String,
    pub examples: Vec<String>,
    pub difficulty: String,
    pub category: String,
    pub common_mistakes: String,
    pub tips: String,
    pub is_mastered: bool,
    pub review_count: i64,
    pub last_reviewed: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reviewable for GrammarRecord {
    fn increment_review(&mut self, now: NaiveDateTime) {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarSummary {
    pub id: i64,
    pub title: String,
    pub structure: String,
    pub difficulty: String,
    pub category: String,
    pub is_mastered: bool,
}

#[derive(Debug, Clone)]
pub struct GrammarInput {
    pub title: String,
    pub structure: String,
    pub explanation: String,
    pub usage: String,
    pub examples: Vec<String>,
    pub difficulty: GrammarLevel,
    pub category: String,
    pub common_mistakes: String,
    pub tips: String,
    pub is_mastered: bool,
}

#[derive(Debug, Default, Clone)]
pub struct GrammarFilter {
    pub search: Option<String>,
    pub difficulty: Option<GrammarLevel>,
    pub category: Option<String>,
    pub is_mastered: Option<bool>,
}

pub async fn list(
    pool: &SqlitePool,
    filter: &GrammarFilter,
) -> Result<Vec<GrammarSummary>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, title, structure, difficulty, category, is_mastered \
         FROM grammar_points WHERE 1 = 1",
    );
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        qb.push(" AND (lower(title) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR lower(structure) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR lower(explanation) LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }
    if let Some(difficulty) = filter.difficulty {
        qb.push(" AND difficulty = ");
        qb.push_bind(difficulty.as_str());
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&category.to_lowercase()));
        qb.push(" AND lower(category) LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\'");
    }
    if let Some(is_mastered) = filter.is_mastered {
        qb.push(" AND is_mastered = ");
        qb.push_bind(is_mastered);
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<GrammarRecord>, sqlx::Error> {
    let sql = format!("SELECT {ALL_COLUMNS} FROM grammar_points WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_grammar_row))
}

pub async fn create(pool: &SqlitePool, input: &GrammarInput) -> Result<GrammarRecord, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let examples = serde_json::to_string(&input.examples).unwrap_or_else(|_| "[]".to_string());
    let result = sqlx::query(
        "INSERT INTO grammar_points \
           (title, structure, explanation, usage, examples, difficulty, category, \
            common_mistakes, tips, is_mastered, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.structure)
    .bind(&input.explanation)
    .bind(&input.usage)
    .bind(&examples)
    .bind(input.difficulty.as_str())
    .bind(&input.category)
    .bind(&input.common_mistakes)
    .bind(&input.tips)
    .bind(input.is_mastered)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM grammar_points WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await?;
    Ok(map_grammar_row(&row))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &GrammarInput,
) -> Result<Option<GrammarRecord>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let examples = serde_json::to_string(&input.examples).unwrap_or_else(|_| "[]".to_string());
    let result = sqlx::query(
        "UPDATE grammar_points SET title = ?, structure = ?, explanation = ?, usage = ?, \
           examples = ?, difficulty = ?, category = ?, common_mistakes = ?, tips = ?, \
           is_mastered = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&input.title)
    .bind(&input.structure)
    .bind(&input.explanation)
    .bind(&input.usage)
    .bind(&examples)
    .bind(input.difficulty.as_str())
    .bind(&input.category)
    .bind(&input.common_mistakes)
    .bind(&input.tips)
    .bind(input.is_mastered)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM grammar_points WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new("DELETE FROM grammar_points WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn review(pool: &SqlitePool, id: i64) -> Result<Option<GrammarRecord>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM grammar_points WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *tx).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut grammar = map_grammar_row(&row);

    let now = Utc::now().naive_utc();
    grammar.increment_review(now);

    sqlx::query(
        "UPDATE grammar_points SET review_count = ?, last_reviewed = ?, updated_at = ? WHERE id = ?",
    )
    .bind(grammar.review_count)
    .bind(grammar.last_reviewed)
    .bind(grammar.updated_at)
    .bind(grammar.id)
    .execute(&mut *tx)
    .await?;

    study_logs::insert(
        &mut tx,
        LogType::Grammar,
        grammar.id,
        "Reviewed grammar",
        &format!("Reviewed grammar: {}", grammar.title),
    )
    .await?;

    tx.commit().await?;
    Ok(Some(grammar))
}

pub async fn toggle_mastered(pool: &SqlitePool, id: i64) -> Result<Option<bool>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE grammar_points SET is_mastered = NOT is_mastered, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    sqlx::query_scalar("SELECT is_mastered FROM grammar_points WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn categories(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT category FROM grammar_points ORDER BY category")
        .fetch_all(pool)
        .await
}

pub async fn search(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<GrammarSummary>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    let rows = sqlx::query(
        "SELECT id, title, structure, difficulty, category, is_mastered \
         FROM grammar_points \
         WHERE lower(title) LIKE ? ESCAPE '\\' OR lower(structure) LIKE ? ESCAPE '\\' \
            OR lower(explanation) LIKE ? ESCAPE '\\' \
         ORDER BY id LIMIT ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

fn map_grammar_row(row: &sqlx::sqlite::SqliteRow) -> GrammarRecord {
    let examples_raw: String = row.try_get("examples").unwrap_or_default();
    GrammarRecord {
        id: row.try_get("id").unwrap_or_default(),
        title: row.try_get("title").unwrap_or_default(),
        structure: row.try_get("structure").unwrap_or_default(),
        explanation: row.try_get("explanation").unwrap_or_default(),
        usage: row.try_get("usage").unwrap_or_default(),
        examples: serde_json::from_str(&examples_raw).unwrap_or_default(),
        difficulty: row.try_get("difficulty").unwrap_or_default(),
        category: row.try_get("category").unwrap_or_default(),
        common_mistakes: row.try_get("common_mistakes").unwrap_or_default(),
        tips: row.try_get("tips").unwrap_or_default(),
        is_mastered: row.try_get("is_mastered").unwrap_or(false),
        review_count: row.try_get("review_count").unwrap_or_default(),
        last_reviewed: row
            .try_get::<Option<NaiveDateTime>, _>("last_reviewed")
            .ok()
            .flatten(),
        created_at: row
            .try_get("created_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
        updated_at: row
            .try_get("updated_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    }
}

fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> GrammarSummary {
    GrammarSummary {
        id: row.try_get("id").unwrap_or_default(),
        title: row.try_get("title").unwrap_or_default(),
        structure: row.try_get("structure").unwrap_or_default(),
        difficulty: row.try_get("difficulty").unwrap_or_default(),
        category: row.try_get("category").unwrap_or_default(),
        is_mastered: row.try_get("is_mastered").unwrap_or(false),
    }
}
