use axum::async_trait;
use sqlx::{types::Json, PgPool};

use super::{DrinkStore, StoreError, StoreResult};
use crate::domain::{Drink, DrinkChanges, Ingredient, NewDrink};

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, sqlx::FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: Json<Vec<Ingredient>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

fn from_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(dbe) = &e {
        if dbe.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicateTitle;
        }
    }
    StoreError::Database(e)
}

#[derive(Clone)]
pub struct PgDrinkStore {
    pool: PgPool,
}

impl PgDrinkStore {
    /// Wrap `pool` and bring the schema up to date.
    pub async fn new(pool: PgPool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Drink schema migrated");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DrinkStore for PgDrinkStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> StoreResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Drink::from).collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Drink::from))
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE title = $1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Drink::from))
    }

    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(&drink.title)
        .bind(Json(&drink.recipe))
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx)?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, changes: DrinkChanges) -> StoreResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.recipe.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;

        Ok(row.map(Drink::from))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
