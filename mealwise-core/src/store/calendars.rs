//! Saved calendars.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::{PlannerError, ValidationError};
use crate::types::{Calendar, DifficultyLevel, ShoppingList, Theme, WeeklyPlan};

const CALENDAR_PREFIX: &str = "calendar::";

fn calendar_key(id: &str) -> String {
    format!("{}{}", CALENDAR_PREFIX, id)
}

/// Fields of a calendar before it is saved.
#[derive(Debug, Clone)]
pub struct NewCalendar {
    pub name: String,
    pub profile_id: String,
    pub plan: WeeklyPlan,
    pub level: DifficultyLevel,
    pub theme: Theme,
}

/// Calendar history. Names are unique ignoring case and surrounding whitespace.
#[derive(Debug, Clone)]
pub struct CalendarHistory {
    store: Arc<dyn KeyValueStore>,
}

impl CalendarHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All calendars, newest first.
    pub fn list(&self) -> Result<Vec<Calendar>, PlannerError> {
        let mut calendars = Vec::new();
        for key in self.store.keys_with_prefix(CALENDAR_PREFIX)? {
            if let Some(calendar) = self.store.get_json::<Calendar>(&key)? {
                calendars.push(calendar);
            }
        }
        calendars.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(calendars)
    }

    pub fn get(&self, id: &str) -> Result<Option<Calendar>, PlannerError> {
        Ok(self.store.get_json(&calendar_key(id))?)
    }

    fn require(&self, id: &str) -> Result<Calendar, PlannerError> {
        self.get(id)?
            .ok_or_else(|| ValidationError::UnknownCalendar(id.to_string()).into())
    }

    fn save(&self, calendar: &Calendar) -> Result<(), PlannerError> {
        self.store.set_json(&calendar_key(&calendar.id), calendar)?;
        Ok(())
    }

    /// Trimmed name, checked against every calendar except `except_id`.
    fn validate_name(&self, name: &str, except_id: Option<&str>) -> Result<String, PlannerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCalendarName.into());
        }
        let folded = name.to_lowercase();
        let taken = self
            .list()?
            .iter()
            .filter(|c| Some(c.id.as_str()) != except_id)
            .any(|c| c.name.trim().to_lowercase() == folded);
        if taken {
            return Err(ValidationError::DuplicateCalendarName(name.to_string()).into());
        }
        Ok(name.to_string())
    }

    pub fn add(&self, new: NewCalendar) -> Result<Calendar, PlannerError> {
        let name = self.validate_name(&new.name, None)?;
        let calendar = Calendar {
            id: format!("calendar_{}", Uuid::new_v4().simple()),
            name,
            created_at: Utc::now(),
            profile_id: new.profile_id,
            plan: new.plan,
            level: new.level,
            theme: new.theme,
            shopping_list: None,
        };
        self.save(&calendar)?;
        tracing::debug!(calendar_id = %calendar.id, "Saved calendar");
        Ok(calendar)
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<Calendar, PlannerError> {
        let mut calendar = self.require(id)?;
        calendar.name = self.validate_name(name, Some(id))?;
        self.save(&calendar)?;
        Ok(calendar)
    }

    pub fn delete(&self, id: &str) -> Result<(), PlannerError> {
        self.require(id)?;
        self.store.remove(&calendar_key(id))?;
        Ok(())
    }

    /// Replace the plan. Any cached shopping list no longer matches and is dropped.
    pub fn update_plan(&self, id: &str, plan: WeeklyPlan) -> Result<Calendar, PlannerError> {
        let mut calendar = self.require(id)?;
        calendar.plan = plan;
        calendar.shopping_list = None;
        self.save(&calendar)?;
        Ok(calendar)
    }

    /// Store `list` with the plan it was built from (`resolved`, which may
    /// carry more recipes than `built_from`), but only if the stored plan
    /// still equals `built_from`. Returns whether anything was written.
    pub fn attach_shopping_list(
        &self,
        id: &str,
        built_from: &WeeklyPlan,
        resolved: WeeklyPlan,
        list: ShoppingList,
    ) -> Result<bool, PlannerError> {
        let mut calendar = self.require(id)?;
        if calendar.plan != *built_from {
            tracing::debug!(calendar_id = id, "Plan changed; discarding stale shopping list");
            return Ok(false);
        }
        calendar.plan = resolved;
        calendar.shopping_list = Some(list);
        self.save(&calendar)?;
        Ok(true)
    }
}
