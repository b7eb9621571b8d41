//! Readiness endpoint
//!
//! Liveness (`/health`) comes from `axum_helpers::health_router`; this
//! module adds `/ready`, which verifies the database connection.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use axum_helpers::{run_health_checks, HealthCheckFuture};
use sea_orm::DatabaseConnection;

async fn ready(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok(response) => response,
        Err(response) => response,
    }
}

pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
