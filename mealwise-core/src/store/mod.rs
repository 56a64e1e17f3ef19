//! Local persistence.
//!
//! Everything is stored as JSON strings in a [`KeyValueStore`]. Writes are
//! last-write-wins; there are no transactions.

mod calendars;
mod favorites;
mod file;
mod memory;
mod profiles;
mod ratings;
pub mod recipe_cache;

pub use calendars::{CalendarHistory, NewCalendar};
pub use favorites::FavoriteRecipes;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use profiles::{ProfileStore, MAX_PROFILES};
pub use ratings::{RatingsStore, MAX_RATING, MIN_RATING};
pub use recipe_cache::RecipeCache;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

impl dyn KeyValueStore {
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
