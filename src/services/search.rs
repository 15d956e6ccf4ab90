use serde::Serialize;
use sqlx::SqlitePool;

use crate::services::{grammar, sentences, words};

const PER_CATEGORY_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub words: Vec<words::WordSummary>,
    pub sentences: Vec<sentences::SentenceSummary>,
    pub grammar: Vec<grammar::GrammarSummary>,
}

impl SearchResults {
    fn empty() -> Self {
        Self {
            words: Vec::new(),
            sentences: Vec::new(),
            grammar: Vec::new(),
        }
    }
}

/// Fans a free-text query out to the three entity searches. A blank query
/// short-circuits to empty result sets.
pub async fn search_all(pool: &SqlitePool, query: &str) -> Result<SearchResults, sqlx::Error> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResults::empty());
    }

    let (words, sentences, grammar) = tokio::try_join!(
        words::search(pool, query, PER_CATEGORY_LIMIT),
        sentences::search(pool, query, PER_CATEGORY_LIMIT),
        grammar::search(pool, query, PER_CATEGORY_LIMIT),
    )?;

    Ok(SearchResults {
        words,
        sentences,
        grammar,
    })
}
