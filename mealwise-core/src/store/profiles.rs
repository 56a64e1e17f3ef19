use std::sync::Arc;
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::{PlannerError, ValidationError};
use crate::types::{NewProfile, UserProfile};

pub const MAX_PROFILES: usize = 5;

const PROFILES_KEY: &str = "profiles";
const ACTIVE_PROFILE_KEY: &str = "active_profile";

/// Household profiles plus the currently active one.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<UserProfile>, PlannerError> {
        Ok(self.store.get_json(PROFILES_KEY)?.unwrap_or_default())
    }

    pub fn get(&self, id: &str) -> Result<Option<UserProfile>, PlannerError> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    /// Create a profile. The first profile becomes active automatically.
    pub fn add(&self, new: NewProfile) -> Result<UserProfile, PlannerError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProfileName.into());
        }

        let mut profiles = self.list()?;
        if profiles.len() >= MAX_PROFILES {
            return Err(ValidationError::TooManyProfiles { max: MAX_PROFILES }.into());
        }

        let profile = UserProfile {
            id: format!("profile_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            diners: new.diners,
            forbidden_foods: clean_foods(new.forbidden_foods),
            prioritize_favorites: new.prioritize_favorites,
        };
        profiles.push(profile.clone());
        self.store.set_json(PROFILES_KEY, &profiles)?;

        if self.active_id()?.is_none() {
            self.store.set_json(ACTIVE_PROFILE_KEY, &profile.id)?;
        }

        tracing::debug!(profile_id = %profile.id, "Created profile");
        Ok(profile)
    }

    pub fn update(&self, profile: &UserProfile) -> Result<(), PlannerError> {
        if profile.name.trim().is_empty() {
            return Err(ValidationError::EmptyProfileName.into());
        }

        let mut profiles = self.list()?;
        let slot = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| ValidationError::UnknownProfile(profile.id.clone()))?;
        *slot = UserProfile {
            name: profile.name.trim().to_string(),
            forbidden_foods: clean_foods(profile.forbidden_foods.clone()),
            ..profile.clone()
        };
        self.store.set_json(PROFILES_KEY, &profiles)?;
        Ok(())
    }

    /// Delete a profile. If it was active, the first remaining profile
    /// (if any) becomes active.
    pub fn delete(&self, id: &str) -> Result<(), PlannerError> {
        let mut profiles = self.list()?;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        if profiles.len() == before {
            return Err(ValidationError::UnknownProfile(id.to_string()).into());
        }
        self.store.set_json(PROFILES_KEY, &profiles)?;

        if self.active_id()?.as_deref() == Some(id) {
            match profiles.first() {
                Some(next) => self.store.set_json(ACTIVE_PROFILE_KEY, &next.id)?,
                None => self.store.remove(ACTIVE_PROFILE_KEY)?,
            }
        }
        Ok(())
    }

    fn active_id(&self) -> Result<Option<String>, PlannerError> {
        Ok(self.store.get_json(ACTIVE_PROFILE_KEY)?)
    }

    pub fn active(&self) -> Result<Option<UserProfile>, PlannerError> {
        match self.active_id()? {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    /// The active profile, or [`ValidationError::NoActiveProfile`].
    pub fn require_active(&self) -> Result<UserProfile, PlannerError> {
        self.active()?
            .ok_or_else(|| ValidationError::NoActiveProfile.into())
    }

    pub fn set_active(&self, id: &str) -> Result<(), PlannerError> {
        if self.get(id)?.is_none() {
            return Err(ValidationError::UnknownProfile(id.to_string()).into());
        }
        self.store.set_json(ACTIVE_PROFILE_KEY, id)?;
        Ok(())
    }
}

fn clean_foods(foods: Vec<String>) -> Vec<String> {
    foods
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}
