use std::time::Duration;

pub use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Connect using `DATABASE_URL` (or the `DB_*` variables), loading `.env` first.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let _ = dotenvy::dotenv();
    connect_with_config(&DatabaseConfig::from_env()).await
}

/// Connect with explicit pool settings.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    cfg.validate()?;
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(max_connections = cfg.max_connections, "database pool ready");
    Ok(db)
}
