use axum::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::{DrinkStore, StoreError, StoreResult};
use crate::domain::{Drink, DrinkChanges, NewDrink};

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemoryDrinkStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    drinks: BTreeMap<i64, Drink>,
}

impl MemoryInner {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }
}

impl MemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkStore for MemoryDrinkStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<Drink>> {
        Ok(self.inner.read().drinks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Drink>> {
        Ok(self.inner.read().drinks.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Drink>> {
        let inner = self.inner.read();
        Ok(inner.drinks.values().find(|d| d.title == title).cloned())
    }

    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink> {
        let mut inner = self.inner.write();
        if inner.title_taken(&drink.title, None) {
            return Err(StoreError::DuplicateTitle);
        }

        inner.last_id += 1;
        let drink = Drink {
            id: inner.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        inner.drinks.insert(drink.id, drink.clone());

        Ok(drink)
    }

    async fn update(&self, id: i64, changes: DrinkChanges) -> StoreResult<Option<Drink>> {
        let mut inner = self.inner.write();
        if let Some(title) = &changes.title {
            if inner.title_taken(title, Some(id)) {
                return Err(StoreError::DuplicateTitle);
            }
        }

        let Some(drink) = inner.drinks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = changes.recipe {
            drink.recipe = recipe;
        }

        Ok(Some(drink.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().drinks.remove(&id).is_some())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
