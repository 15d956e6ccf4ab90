use chrono::{NaiveDateTime, Utc};
use rand::seq::IndexedRandom;
use serde::Serialize;
use sqlx::{QueryBuilder, Row, SqlitePool};

use crate::models::{LogType, Reviewable, SentenceType};
use crate::services::{escape_like, study_logs, truncate_chars};

const ALL_COLUMNS: &str = "id, english, chinese, sentence_type, keywords, grammar_points, notes, \
                           is_favorite, review_count, last_reviewed, created_at, updated_at";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceRecord {
    pub id: i64,
    pub english: String,
    pub chinese: String,
    pub sentence_type: String,
    pub keywords: String,
    pub grammar_points: String,
    pub notes: String,
    pub is_favorite: bool,
    pub review_count: i64,
    pub last_reviewed: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reviewable for SentenceRecord {
    fn increment_review(&mut self, now: NaiveDateTime) {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceSummary {
    pub id: i64,
    pub english: String,
    pub chinese: String,
    pub sentence_type: String,
    pub is_favorite: bool,
    pub review_count: i64,
}

#[derive(Debug, Clone)]
pub struct SentenceInput {
    pub english: String,
    pub chinese: String,
    pub sentence_type: SentenceType,
    pub keywords: String,
    pub grammar_points: String,
    pub notes: String,
    pub is_favorite: bool,
}

#[derive(Debug, Default, Clone)]
pub struct SentenceFilter {
    pub search: Option<String>,
    pub sentence_type: Option<SentenceType>,
    pub is_favorite: Option<bool>,
}

pub async fn list(
    pool: &SqlitePool,
    filter: &SentenceFilter,
) -> Result<Vec<SentenceSummary>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, english, chinese, sentence_type, is_favorite, review_count \
         FROM sentences WHERE 1 = 1",
    );
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        qb.push(" AND (lower(english) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR lower(chinese) LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }
    if let Some(sentence_type) = filter.sentence_type {
        qb.push(" AND sentence_type = ");
        qb.push_bind(sentence_type.as_str());
    }
    if let Some(is_favorite) = filter.is_favorite {
        qb.push(" AND is_favorite = ");
        qb.push_bind(is_favorite);
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<SentenceRecord>, sqlx::Error> {
    let sql = format!("SELECT {ALL_COLUMNS} FROM sentences WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_sentence_row))
}

pub async fn create(pool: &SqlitePool, input: &SentenceInput) -> Result<SentenceRecord, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO sentences \
           (english, chinese, sentence_type, keywords, grammar_points, notes, is_favorite, \
            created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.english)
    .bind(&input.chinese)
    .bind(input.sentence_type.as_str())
    .bind(&input.keywords)
    .bind(&input.grammar_points)
    .bind(&input.notes)
    .bind(input.is_favorite)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM sentences WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await?;
    Ok(map_sentence_row(&row))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &SentenceInput,
) -> Result<Option<SentenceRecord>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE sentences SET english = ?, chinese = ?, sentence_type = ?, keywords = ?, \
           grammar_points = ?, notes = ?, is_favorite = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&input.english)
    .bind(&input.chinese)
    .bind(input.sentence_type.as_str())
    .bind(&input.keywords)
    .bind(&input.grammar_points)
    .bind(&input.notes)
    .bind(input.is_favorite)
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
    let result = sqlx::query("DELETE FROM sentences WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new("DELETE FROM sentences WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn review(pool: &SqlitePool, id: i64) -> Result<Option<SentenceRecord>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM sentences WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *tx).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut sentence = map_sentence_row(&row);

    let now = Utc::now().naive_utc();
    sentence.increment_review(now);

    sqlx::query(
        "UPDATE sentences SET review_count = ?, last_reviewed = ?, updated_at = ? WHERE id = ?",
    )
    .bind(sentence.review_count)
    .bind(sentence.last_reviewed)
    .bind(sentence.updated_at)
    .bind(sentence.id)
    .execute(&mut *tx)
    .await?;

    study_logs::insert(
        &mut tx,
        LogType::Sentence,
        sentence.id,
        "Reviewed sentence",
        &format!(
            "Reviewed sentence: {}...",
            truncate_chars(&sentence.english, 30)
        ),
    )
    .await?;

    tx.commit().await?;
    Ok(Some(sentence))
}

pub async fn toggle_favorite(pool: &SqlitePool, id: i64) -> Result<Option<bool>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE sentences SET is_favorite = NOT is_favorite, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    sqlx::query_scalar("SELECT is_favorite FROM sentences WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn random(pool: &SqlitePool, count: usize) -> Result<Vec<SentenceRecord>, sqlx::Error> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM sentences")
        .fetch_all(pool)
        .await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // The rng must drop before the next await; ThreadRng is not Send.
    let picked: Vec<i64> = {
        let mut rng = rand::rng();
        ids.choose_multiple(&mut rng, count.min(ids.len()))
            .copied()
            .collect()
    };

    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        "SELECT {ALL_COLUMNS} FROM sentences WHERE id IN ("
    ));
    let mut separated = qb.separated(", ");
    for id in &picked {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_sentence_row).collect())
}

pub async fn search(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<SentenceSummary>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    let rows = sqlx::query(
        "SELECT id, english, chinese, sentence_type, is_favorite, review_count \
         FROM sentences \
         WHERE lower(english) LIKE ? ESCAPE '\\' OR lower(chinese) LIKE ? ESCAPE '\\' \
         ORDER BY id LIMIT ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

fn map_sentence_row(row: &sqlx::sqlite::SqliteRow) -> SentenceRecord {
    SentenceRecord {
        id: row.try_get("id").unwrap_or_default(),
        english: row.try_get("english").unwrap_or_default(),
        chinese: row.try_get("chinese").unwrap_or_default(),
        sentence_type: row.try_get("sentence_type").unwrap_or_default(),
        keywords: row.try_get("keywords").unwrap_or_default(),
        grammar_points: row.try_get("grammar_points").unwrap_or_default(),
        notes: row.try_get("notes").unwrap_or_default(),
        is_favorite: row.try_get("is_favorite").unwrap_or(false),
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

fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> SentenceSummary {
    SentenceSummary {
        id: row.try_get("id").unwrap_or_default(),
        english: row.try_get("english").unwrap_or_default(),
        chinese: row.try_get("chinese").unwrap_or_default(),
        sentence_type: row.try_get("sentence_type").unwrap_or_default(),
        is_favorite: row.try_get("is_favorite").unwrap_or(false),
        review_count: row.try_get("review_count").unwrap_or_default(),
    }
}
