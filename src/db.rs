//! Database connection pool management

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::store::{DrinkStore, MemoryDrinkStore, PgDrinkStore};

/// Create a PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(database_url)
        .context("Invalid DATABASE_URL")?
        .application_name("coffee-shop-api");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!(max_connections, "Database connection pool established");

    Ok(pool)
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-memory store.
pub async fn create_store(settings: &Settings) -> Result<Arc<dyn DrinkStore>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, drinks are kept in memory");
        return Ok(Arc::new(MemoryDrinkStore::new()));
    };

    let pool = create_pool(database_url, settings.database_max_connections).await?;
    let store = PgDrinkStore::new(pool)
        .await
        .context("Failed to migrate drinks schema")?;

    Ok(Arc::new(store))
}
