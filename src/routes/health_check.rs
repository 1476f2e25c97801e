use crate::app_state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use sqlx::PgPool;

pub fn router() -> Router<AppState> {
    Router::new().route("/health_check", get(health_check))
}

/// Reports 200 while the database answers, 503 otherwise.
#[tracing::instrument(name = "Health check", skip(db_pool))]
async fn health_check(State(db_pool): State<PgPool>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&db_pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Database is unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
