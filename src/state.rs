use std::time::Instant;

use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            started_at: Instant::now(),
            db,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        self.db.pool()
    }
}
