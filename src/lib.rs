pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::{Database, DbInitError};
use crate::state::AppState;

pub async fn create_app() -> Result<axum::Router, DbInitError> {
    let db = Database::from_env().await?;
    build_app(db).await
}

/// Builds the application against an explicit database URL. Integration tests
/// use this to point each test at its own store.
pub async fn create_app_with_url(url: &str) -> Result<axum::Router, DbInitError> {
    let db = Database::connect(url).await?;
    build_app(db).await
}

async fn build_app(db: Database) -> Result<axum::Router, DbInitError> {
    db::migrate::run_migrations(db.pool()).await?;
    let state = AppState::new(db);

    Ok(routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
