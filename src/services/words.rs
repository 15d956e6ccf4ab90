use chrono::{NaiveDateTime, Utc};
use rand::seq::IndexedRandom;
use serde::Serialize;
use sqlx::{QueryBuilder, Row, SqlitePool};

use crate::models::{Difficulty, LogType, Reviewable};
use crate::services::{escape_like, study_logs};

const ALL_COLUMNS: &str = "id, word, phonetic, meaning, part_of_speech, example_sentence, \
                           example_translation, difficulty, category, notes, review_count, \
                           last_reviewed, is_favorite, created_at, updated_at";

/// Full record projection, returned by detail and mutation endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: i64,
    pub word: String,
    pub phonetic: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub example_sentence: String,
    pub example_translation: String,
    pub difficulty: String,
    pub category: String,
    pub notes: String,
    pub review_count: i64,
    pub last_reviewed: Option<NaiveDateTime>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reviewable for WordRecord {
    fn increment_review(&mut self, now: NaiveDateTime) {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        self.updated_at = now;
    }
}

/// Summary projection for list and search responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSummary {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub difficulty: String,
    pub is_favorite: bool,
    pub review_count: i64,
}

/// Validated create/update payload. Updates replace every writable field;
/// review bookkeeping stays untouched.
#[derive(Debug, Clone)]
pub struct WordInput {
    pub word: String,
    pub phonetic: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub example_sentence: String,
    pub example_translation: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub notes: String,
    pub is_favorite: bool,
}

#[derive(Debug, Default, Clone)]
pub struct WordFilter {
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub is_favorite: Option<bool>,
    pub category: Option<String>,
}

pub async fn list(pool: &SqlitePool, filter: &WordFilter) -> Result<Vec<WordSummary>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT id, word, meaning, part_of_speech, difficulty, is_favorite, review_count \
         FROM words WHERE 1 = 1",
    );
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        qb.push(" AND (lower(word) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR lower(meaning) LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }
    if let Some(difficulty) = filter.difficulty {
        qb.push(" AND difficulty = ");
        qb.push_bind(difficulty.as_str());
    }
    if let Some(is_favorite) = filter.is_favorite {
        qb.push(" AND is_favorite = ");
        qb.push_bind(is_favorite);
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&category.to_lowercase()));
        qb.push(" AND lower(category) LIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\'");
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<WordRecord>, sqlx::Error> {
    let sql = format!("SELECT {ALL_COLUMNS} FROM words WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_word_row))
}

pub async fn create(pool: &SqlitePool, input: &WordInput) -> Result<WordRecord, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO words \
           (word, phonetic, meaning, part_of_speech, example_sentence, example_translation, \
            difficulty, category, notes, is_favorite, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.word)
    .bind(&input.phonetic)
    .bind(&input.meaning)
    .bind(&input.part_of_speech)
    .bind(&input.example_sentence)
    .bind(&input.example_translation)
    .bind(input.difficulty.as_str())
    .bind(&input.category)
    .bind(&input.notes)
    .bind(input.is_favorite)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM words WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await?;
    Ok(map_word_row(&row))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &WordInput,
) -> Result<Option<WordRecord>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "UPDATE words SET word = ?, phonetic = ?, meaning = ?, part_of_speech = ?, \
           example_sentence = ?, example_translation = ?, difficulty = ?, category = ?, \
           notes = ?, is_favorite = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&input.word)
    .bind(&input.phonetic)
    .bind(&input.meaning)
    .bind(&input.part_of_speech)
    .bind(&input.example_sentence)
    .bind(&input.example_translation)
    .bind(input.difficulty.as_str())
    .bind(&input.category)
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
    let result = sqlx::query("DELETE FROM words WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Single-statement delete, all-or-nothing. Reports rows actually removed.
pub async fn delete_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new("DELETE FROM words WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Review action: counter + timestamp + study-log entry, one transaction.
pub async fn review(pool: &SqlitePool, id: i64) -> Result<Option<WordRecord>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ALL_COLUMNS} FROM words WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *tx).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut word = map_word_row(&row);

    let now = Utc::now().naive_utc();
    word.increment_review(now);

    sqlx::query("UPDATE words SET review_count = ?, last_reviewed = ?, updated_at = ? WHERE id = ?")
        .bind(word.review_count)
        .bind(word.last_reviewed)
        .bind(word.updated_at)
        .bind(word.id)
        .execute(&mut *tx)
        .await?;

    study_logs::insert(
        &mut tx,
        LogType::Word,
        word.id,
        "Reviewed word",
        &format!("Reviewed word: {}", word.word),
    )
    .await?;

    tx.commit().await?;
    Ok(Some(word))
}

pub async fn toggle_favorite(pool: &SqlitePool, id: i64) -> Result<Option<bool>, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let result =
        sqlx::query("UPDATE words SET is_favorite = NOT is_favorite, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    sqlx::query_scalar("SELECT is_favorite FROM words WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn categories(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT category FROM words WHERE category <> '' ORDER BY category")
        .fetch_all(pool)
        .await
}

/// Samples `count` ids without replacement, then loads the full records. The
/// result order is whatever the IN query yields.
pub async fn random(pool: &SqlitePool, count: usize) -> Result<Vec<WordRecord>, sqlx::Error> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM words")
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

    let mut qb =
        QueryBuilder::<sqlx::Sqlite>::new(format!("SELECT {ALL_COLUMNS} FROM words WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in &picked {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(map_word_row).collect())
}

pub async fn search(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<WordSummary>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    let rows = sqlx::query(
        "SELECT id, word, meaning, part_of_speech, difficulty, is_favorite, review_count \
         FROM words \
         WHERE lower(word) LIKE ? ESCAPE '\\' OR lower(meaning) LIKE ? ESCAPE '\\' \
         ORDER BY id LIMIT ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(map_summary_row).collect())
}

fn map_word_row(row: &sqlx::sqlite::SqliteRow) -> WordRecord {
    WordRecord {
        id: row.try_get("id").unwrap_or_default(),
        word: row.try_get("word").unwrap_or_default(),
        phonetic: row.try_get("phonetic").unwrap_or_default(),
        meaning: row.try_get("meaning").unwrap_or_default(),
        part_of_speech: row.try_get("part_of_speech").unwrap_or_default(),
        example_sentence: row.try_get("example_sentence").unwrap_or_default(),
        example_translation: row.try_get("example_translation").unwrap_or_default(),
        difficulty: row.try_get("difficulty").unwrap_or_default(),
        category: row.try_get("category").unwrap_or_default(),
        notes: row.try_get("notes").unwrap_or_default(),
        review_count: row.try_get("review_count").unwrap_or_default(),
        last_reviewed: row
            .try_get::<Option<NaiveDateTime>, _>("last_reviewed")
            .ok()
            .flatten(),
        is_favorite: row.try_get("is_favorite").unwrap_or(false),
        created_at: row
            .try_get("created_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
        updated_at: row
            .try_get("updated_at")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    }
}

fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> WordSummary {
    WordSummary {
        id: row.try_get("id").unwrap_or_default(),
        word: row.try_get("word").unwrap_or_default(),
        meaning: row.try_get("meaning").unwrap_or_default(),
        part_of_speech: row.try_get("part_of_speech").unwrap_or_default(),
        difficulty: row.try_get("difficulty").unwrap_or_default(),
        is_favorite: row.try_get("is_favorite").unwrap_or(false),
        review_count: row.try_get("review_count").unwrap_or_default(),
    }
}
