use std::collections::{BTreeMap, HashSet};

use crate::ai::PreferenceSignals;
use crate::types::{normalize_meal_name, Recipe, UserProfile};

/// Ratings at or above this promote a recipe.
pub const HIGH_RATING: u8 = 4;
/// Ratings at or below this forbid a recipe.
pub const LOW_RATING: u8 = 2;

/// Derive skeleton hints from what the household already knows.
///
/// Known recipes are favorites followed by cached recipes, unique by id.
/// Names inside each list are unique ignoring case.
pub fn collect_signals(
    profile: &UserProfile,
    favorites: &[Recipe],
    cached: &[Recipe],
    ratings: &BTreeMap<String, u8>,
) -> PreferenceSignals {
    let mut seen_ids = HashSet::new();
    let known: Vec<&Recipe> = favorites
        .iter()
        .chain(cached)
        .filter(|recipe| seen_ids.insert(recipe.id.as_str()))
        .collect();

    let rated = |keep: fn(u8) -> bool| {
        unique_names(
            known
                .iter()
                .filter(|recipe| ratings.get(&recipe.id).is_some_and(|r| keep(*r)))
                .map(|recipe| recipe.name.as_str()),
        )
    };

    PreferenceSignals {
        favorites: if profile.prioritize_favorites {
            unique_names(favorites.iter().map(|recipe| recipe.name.as_str()))
        } else {
            Vec::new()
        },
        highly_rated: rated(|r| r >= HIGH_RATING),
        poorly_rated: rated(|r| r <= LOW_RATING),
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(normalize_meal_name(name)))
        .map(str::to_string)
        .collect()
}
