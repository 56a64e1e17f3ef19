//! Recipe cache keyed by profile, difficulty level and normalized meal name.

use std::sync::Arc;

use super::{KeyValueStore, StoreError};
use crate::types::{normalize_meal_name, DifficultyLevel, Recipe};

pub const RECIPE_CACHE_PREFIX: &str = "recipe_cache::";

/// Storage key for a cached recipe. Names differing only in case or
/// surrounding whitespace share a key.
pub fn cache_key(meal_name: &str, level: DifficultyLevel, profile_id: &str) -> String {
    format!(
        "{}{}::{}::{}",
        RECIPE_CACHE_PREFIX,
        profile_id,
        level.as_str(),
        normalize_meal_name(meal_name)
    )
}

/// Every entry is its own record, so concurrent writes to different
/// meals never clobber each other. Entries are never evicted.
#[derive(Debug, Clone)]
pub struct RecipeCache {
    store: Arc<dyn KeyValueStore>,
}

impl RecipeCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn lookup(
        &self,
        meal_name: &str,
        level: DifficultyLevel,
        profile_id: &str,
    ) -> Result<Option<Recipe>, StoreError> {
        self.store
            .get_json(&cache_key(meal_name, level, profile_id))
    }

    /// Insert or overwrite.
    pub fn store(
        &self,
        meal_name: &str,
        level: DifficultyLevel,
        profile_id: &str,
        recipe: &Recipe,
    ) -> Result<(), StoreError> {
        let key = cache_key(meal_name, level, profile_id);
        tracing::debug!(key = %key, "Caching recipe");
        self.store.set_json(&key, recipe)
    }

    /// All cached recipes across profiles and levels. Unreadable entries are skipped.
    pub fn recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes = Vec::new();
        for key in self.store.keys_with_prefix(RECIPE_CACHE_PREFIX)? {
            match self.store.get_json::<Recipe>(&key) {
                Ok(Some(recipe)) => recipes.push(recipe),
                Ok(None) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping corrupt cache entry"),
            }
        }
        Ok(recipes)
    }
}
