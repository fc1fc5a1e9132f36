use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::store::SeaOrmStore;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `RUN_MIGRATIONS=true` (or `1`) applies pending migrations before serving.
fn migrations_requested() -> bool {
    std::env::var("RUN_MIGRATIONS")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Public entry: connect, optionally migrate, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let addr = bind_addr(&cfg)?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    if migrations_requested() {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let state = ServerState::new(Arc::new(SeaOrmStore::new(db)));
    let app: Router = routes::build_router(state, build_cors());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, "starting server");
    axum::serve(listener, app).await?;
    Ok(())
}
