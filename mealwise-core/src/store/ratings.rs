use std::collections::BTreeMap;
use std::sync::Arc;

use super::KeyValueStore;
use crate::error::{PlannerError, ValidationError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

const RATING_PREFIX: &str = "rating::";

fn rating_key(recipe_id: &str) -> String {
    format!("{}{}", RATING_PREFIX, recipe_id)
}

/// Star ratings keyed by recipe id. Each rating is its own record.
#[derive(Debug, Clone)]
pub struct RatingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl RatingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Result<BTreeMap<String, u8>, PlannerError> {
        let mut ratings = BTreeMap::new();
        for key in self.store.keys_with_prefix(RATING_PREFIX)? {
            if let Some(rating) = self.store.get_json::<u8>(&key)? {
                ratings.insert(key[RATING_PREFIX.len()..].to_string(), rating);
            }
        }
        Ok(ratings)
    }

    pub fn rating(&self, recipe_id: &str) -> Result<Option<u8>, PlannerError> {
        Ok(self.store.get_json(&rating_key(recipe_id))?)
    }

    /// Out-of-range values are rejected and nothing is written.
    pub fn set_rating(&self, recipe_id: &str, value: i64) -> Result<(), PlannerError> {
        let rating = u8::try_from(value)
            .ok()
            .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
            .ok_or(ValidationError::RatingOutOfRange(value))?;

        self.store.set_json(&rating_key(recipe_id), &rating)?;
        tracing::debug!(recipe_id = recipe_id, rating = rating, "Saved rating");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_rating_bounds() {
        let ratings = RatingsStore::new(Arc::new(MemoryStore::new()));
        ratings.set_rating("r1", 4).unwrap();

        for bad in [0, 6, -1, 300] {
            let err = ratings.set_rating("r1", bad).unwrap_err();
            assert!(matches!(
                err,
                PlannerError::Validation(ValidationError::RatingOutOfRange(v)) if v == bad
            ));
        }
        assert_eq!(ratings.rating("r1").unwrap(), Some(4));

        ratings.set_rating("r1", 1).unwrap();
        ratings.set_rating("r2", 5).unwrap();
        assert_eq!(ratings.rating("r1").unwrap(), Some(1));
        assert_eq!(ratings.all().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_ratings_are_all_kept() {
        let ratings = RatingsStore::new(Arc::new(MemoryStore::new()));

        std::thread::scope(|scope| {
            for t in 0..8 {
                let ratings = ratings.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        ratings.set_rating(&format!("r{t}_{i}"), 3).unwrap();
                    }
                });
            }
        });

        let all = ratings.all().unwrap();
        assert_eq!(all.len(), 1600);
        assert!(all.values().all(|rating| *rating == 3));
        assert_eq!(ratings.rating("r7_199").unwrap(), Some(3));
    }
}
