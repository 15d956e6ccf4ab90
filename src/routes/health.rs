use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::routes::ok_json;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    uptime_seconds: u64,
    database: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Response {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "health probe failed");
            "unavailable"
        }
    };
    ok_json(HealthReport {
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        database,
    })
}
