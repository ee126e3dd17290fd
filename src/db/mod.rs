use anyhow::Result;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config::Config;

pub mod models;

pub type DbPool = SqlitePool;

pub async fn init(cfg: &Config) -> Result<DbPool> {
    let db_url = format!("sqlite://{}?mode=rwc", cfg.database.path);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            sqlx::sqlite::SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true),
        )
        .await?;

    sqlx::migrate!("./src/db/migrations").run(&pool).await?;

    // WAL keeps concurrent readers cheap for the admin listing endpoints
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;
    sqlx::query("PRAGMA foreign_keys=ON").execute(&pool).await?;

    tracing::info!("Database connected: {}", cfg.database.path);
    Ok(pool)
}

/// In-memory pool with migrations applied. Used by tests.
///
/// Pinned to a single never-expiring connection: every pooled connection to
/// `:memory:` would otherwise open its own empty database.
pub async fn init_in_memory() -> Result<DbPool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./src/db/migrations").run(&pool).await?;
    Ok(pool)
}
