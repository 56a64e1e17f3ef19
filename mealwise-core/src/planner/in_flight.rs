use dashmap::DashSet;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::types::{MealSlot, Weekday};

/// Slots with an edit in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightSlots {
    slots: Arc<DashSet<(Weekday, MealSlot)>>,
}

impl InFlightSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a slot busy until the returned guard is dropped.
    pub fn acquire(&self, day: Weekday, slot: MealSlot) -> Result<SlotGuard, ValidationError> {
        if !self.slots.insert((day, slot)) {
            return Err(ValidationError::SlotBusy { day, slot });
        }
        Ok(SlotGuard {
            slots: Arc::clone(&self.slots),
            key: (day, slot),
        })
    }

    pub fn is_busy(&self, day: Weekday, slot: MealSlot) -> bool {
        self.slots.contains(&(day, slot))
    }
}

#[derive(Debug)]
pub struct SlotGuard {
    slots: Arc<DashSet<(Weekday, MealSlot)>>,
    key: (Weekday, MealSlot),
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slots.remove(&self.key);
    }
}
