//! Drink persistence

pub mod memory;
pub mod postgres;

use axum::async_trait;
use thiserror::Error;

use crate::domain::{Drink, DrinkChanges, NewDrink};

pub use memory::MemoryDrinkStore;
pub use postgres::PgDrinkStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a drink with this title already exists")]
    DuplicateTitle,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Storage for drinks. Titles are unique.
#[async_trait]
pub trait DrinkStore: Send + Sync + 'static {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// All drinks, ordered by id.
    async fn list(&self) -> StoreResult<Vec<Drink>>;

    async fn get(&self, id: i64) -> StoreResult<Option<Drink>>;

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Drink>>;

    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink>;

    /// Apply `changes`; `Ok(None)` when no drink has `id`.
    async fn update(&self, id: i64, changes: DrinkChanges) -> StoreResult<Option<Drink>>;

    /// Returns whether a drink was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
}
