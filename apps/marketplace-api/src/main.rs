//! Marketplace API - REST server for the catalog (categories and products)

use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");

    let db = database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
        .await?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    // Build REST router
    let api_routes = api::routes(&db);
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(config.app.clone()))
        .merge(api::health::router(db.clone()));

    info!(
        "Starting Marketplace API on {}:{}",
        config.server.host, config.server.port
    );

    // Run server with graceful shutdown
    let cleanup_db = db.clone();
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        close_postgres(cleanup_db, "main").await;
    })
    .await?;

    info!("Marketplace API shutdown complete");
    Ok(())
}
