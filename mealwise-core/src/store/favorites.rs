use std::sync::Arc;

use super::{KeyValueStore, StoreError};
use crate::types::Recipe;

const FAVORITE_PREFIX: &str = "favorite::";

fn favorite_key(recipe_id: &str) -> String {
    format!("{}{}", FAVORITE_PREFIX, recipe_id)
}

/// Favorite recipes, one record per recipe id.
#[derive(Debug, Clone)]
pub struct FavoriteRecipes {
    store: Arc<dyn KeyValueStore>,
}

impl FavoriteRecipes {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All favorites, ordered by recipe id.
    pub fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut favorites = Vec::new();
        for key in self.store.keys_with_prefix(FAVORITE_PREFIX)? {
            if let Some(recipe) = self.store.get_json::<Recipe>(&key)? {
                favorites.push(recipe);
            }
        }
        Ok(favorites)
    }

    /// Returns false if a recipe with the same id is already a favorite.
    pub fn add(&self, recipe: &Recipe) -> Result<bool, StoreError> {
        let key = favorite_key(&recipe.id);
        if self.store.get(&key)?.is_some() {
            return Ok(false);
        }
        self.store.set_json(&key, recipe)?;
        Ok(true)
    }

    pub fn remove(&self, recipe_id: &str) -> Result<bool, StoreError> {
        let key = favorite_key(recipe_id);
        if self.store.get(&key)?.is_none() {
            return Ok(false);
        }
        self.store.remove(&key)?;
        Ok(true)
    }

    pub fn is_favorite(&self, recipe_id: &str) -> Result<bool, StoreError> {
        Ok(self.store.get(&favorite_key(recipe_id))?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{Complexity, RecipeCategory};

    fn recipe(id: &str, name: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            instructions: vec![],
            ingredients: vec![],
            complexity: Complexity::Medium,
            prep_time: "45 min".to_string(),
            category: RecipeCategory::Mixed,
        }
    }

    #[test]
    fn test_add_is_unique_by_id() {
        let favorites = FavoriteRecipes::new(Arc::new(MemoryStore::new()));
        let paella = recipe("recipe_1", "Paella");

        assert!(favorites.add(&paella).unwrap());
        assert!(!favorites.add(&paella).unwrap());
        assert!(favorites.is_favorite("recipe_1").unwrap());
        assert_eq!(favorites.list().unwrap(), vec![paella]);
        assert!(favorites.remove("recipe_1").unwrap());
        assert!(!favorites.remove("recipe_1").unwrap());
        assert!(favorites.list().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_adds_are_all_kept() {
        let favorites = FavoriteRecipes::new(Arc::new(MemoryStore::new()));

        std::thread::scope(|scope| {
            for t in 0..8 {
                let favorites = favorites.clone();
                scope.spawn(move || {
                    for i in 0..50 {
                        let id = format!("recipe_{t}_{i}");
                        assert!(favorites.add(&recipe(&id, "Stew")).unwrap());
                    }
                });
            }
        });

        assert_eq!(favorites.list().unwrap().len(), 400);
        assert!(favorites.remove("recipe_3_7").unwrap());
        assert_eq!(favorites.list().unwrap().len(), 399);
    }
}
