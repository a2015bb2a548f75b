use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect to the configured store and bring its schema up to date.
pub async fn prepare_database(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    common::env::ensure_database_dir(&cfg.url).await?;
    let db = models::db::connect_with_config(cfg).await?;
    if cfg.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    } else {
        warn!(event = "migrations_skipped", "run_migrations disabled; assuming schema exists");
    }
    Ok(db)
}

pub fn build_app(cfg: &AppConfig, db: DatabaseConnection) -> Router {
    routes::build_router(ServerState { db }, build_cors(), &cfg.server.api_prefix)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "server", event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: prepare the database, bind, and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = prepare_database(&cfg.database).await?;
    let app = build_app(&cfg, db);

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, prefix = %cfg.server.api_prefix, "starting server");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
