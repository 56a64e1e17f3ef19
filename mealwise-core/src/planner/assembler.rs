//! Plan assembly: skeleton, recipe resolution, swaps.
//!
//! A plan costs at most two generation calls: one for the dish names and
//! one batch call for every name that neither favorites nor the recipe
//! cache can satisfy.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::signals::collect_signals;
use crate::ai::{GenerationGateway, WeeklyPlanRequest};
use crate::error::{PlannerError, ValidationError};
use crate::i18n::TemplateKey;
use crate::store::{FavoriteRecipes, RatingsStore, RecipeCache};
use crate::types::{
    normalize_meal_name, CalendarLength, DifficultyLevel, Meal, MealSlot, Recipe, Theme,
    UserProfile, Weekday, WeeklyPlan,
};

/// Knobs for one skeleton request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    pub length: CalendarLength,
    pub level: DifficultyLevel,
    pub theme: Theme,
    /// Plan dinners that reuse lunch leftovers.
    pub leftovers: bool,
}

/// A slot's recipe and the plan it now lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredRecipe {
    pub plan: WeeklyPlan,
    pub recipe: Recipe,
}

/// A failed swap. `restored` is the plan exactly as it was before the swap.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SwapError {
    pub restored: WeeklyPlan,
    #[source]
    pub source: PlannerError,
}

#[derive(Debug, Clone)]
pub struct PlanAssembler {
    gateway: GenerationGateway,
    cache: RecipeCache,
    favorites: FavoriteRecipes,
    ratings: RatingsStore,
}

impl PlanAssembler {
    pub fn new(
        gateway: GenerationGateway,
        cache: RecipeCache,
        favorites: FavoriteRecipes,
        ratings: RatingsStore,
    ) -> Self {
        Self {
            gateway,
            cache,
            favorites,
            ratings,
        }
    }

    pub fn gateway(&self) -> &GenerationGateway {
        &self.gateway
    }

    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
        options: PlanOptions,
    ) -> Result<WeeklyPlan, PlannerError> {
        let favorites = self.favorites.list()?;
        let signals = collect_signals(
            profile,
            &favorites,
            &self.cache.recipes()?,
            &self.ratings.all()?,
        );

        let request = WeeklyPlanRequest {
            profile,
            length: options.length,
            level: options.level,
            theme: options.theme,
            leftovers: options.leftovers,
            signals: &signals,
        };
        let skeleton = self.gateway.weekly_skeleton(&request).await?;

        let missing_days: Vec<&str> = options
            .length
            .days()
            .iter()
            .filter(|day| skeleton.day(**day).is_none())
            .map(Weekday::as_str)
            .collect();
        if !missing_days.is_empty() {
            return Err(PlannerError::malformed(
                self.gateway.translator().text(TemplateKey::WeeklyPlanContext),
                format!("missing days: {}", missing_days.join(", ")),
            ));
        }

        let skeleton = skeleton.truncated(options.length);
        self.attach_recipes(&skeleton, profile, options.level, &favorites)
            .await
    }

    /// Give every pending meal a recipe from favorites, the cache, or one
    /// batch call.
    pub async fn resolve_recipes(
        &self,
        plan: &WeeklyPlan,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<WeeklyPlan, PlannerError> {
        let favorites = self.favorites.list()?;
        self.attach_recipes(plan, profile, level, &favorites).await
    }

    async fn attach_recipes(
        &self,
        plan: &WeeklyPlan,
        profile: &UserProfile,
        level: DifficultyLevel,
        favorites: &[Recipe],
    ) -> Result<WeeklyPlan, PlannerError> {
        let pending = plan.pending_meal_names();
        if pending.is_empty() {
            return Ok(plan.clone());
        }

        let mut favorite_by_name: HashMap<String, &Recipe> = HashMap::new();
        for recipe in favorites {
            favorite_by_name
                .entry(normalize_meal_name(&recipe.name))
                .or_insert(recipe);
        }

        let mut cached = HashMap::new();
        let mut missing = Vec::new();
        for name in &pending {
            let key = normalize_meal_name(name);
            if favorite_by_name.contains_key(&key) {
                continue;
            }
            match self.lookup_cached(name, level, &profile.id) {
                Some(recipe) => {
                    cached.insert(key, recipe);
                }
                None => missing.push(name.clone()),
            }
        }

        let mut fresh = HashMap::new();
        if !missing.is_empty() {
            let requested: HashSet<String> =
                missing.iter().map(|name| normalize_meal_name(name)).collect();
            for (name, recipe) in self.gateway.recipe_batch(&missing, profile, level).await? {
                let key = normalize_meal_name(&name);
                if !requested.contains(&key) {
                    tracing::debug!(meal = %name, "Ignoring recipe for a meal that was not requested");
                    continue;
                }
                self.store_cached(&name, level, &profile.id, &recipe);
                fresh.entry(key).or_insert(recipe);
            }
        }

        tracing::debug!(
            pending = pending.len(),
            cached = cached.len(),
            requested = missing.len(),
            received = fresh.len(),
            "Resolved recipes"
        );

        Ok(plan.fill_recipes(|name| {
            let key = normalize_meal_name(name);
            favorite_by_name
                .get(&key)
                .map(|recipe| (*recipe).clone())
                .or_else(|| cached.get(&key).cloned())
                .or_else(|| fresh.get(&key).cloned())
        }))
    }

    /// The recipe for one slot, generating it only on a cache miss.
    pub async fn ensure_recipe(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<EnsuredRecipe, PlannerError> {
        let meal = plan
            .meal(day, slot)
            .ok_or(ValidationError::SlotNotPlanned { day, slot })?;
        if let Some(recipe) = meal.recipe() {
            return Ok(EnsuredRecipe {
                plan: plan.clone(),
                recipe: recipe.clone(),
            });
        }
        if !meal.is_pending() {
            return Err(ValidationError::SlotNotPlanned { day, slot }.into());
        }

        let name = meal.name();
        let recipe = match self.lookup_cached(name, level, &profile.id) {
            Some(recipe) => recipe,
            None => {
                let recipe = self.gateway.recipe(name, profile, level).await?;
                self.store_cached(name, level, &profile.id, &recipe);
                recipe
            }
        };

        let plan = plan
            .with_meal(day, slot, meal.with_recipe(recipe.clone()))
            .ok_or(ValidationError::SlotNotPlanned { day, slot })?;
        Ok(EnsuredRecipe { plan, recipe })
    }

    pub async fn swap_suggestions(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        profile: &UserProfile,
        level: DifficultyLevel,
        theme: Theme,
    ) -> Result<Vec<String>, PlannerError> {
        let original = plan
            .meal(day, slot)
            .map(|meal| meal.name().trim())
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::SlotNotPlanned { day, slot })?;

        let existing = main_dish_names(plan, original);
        self.gateway
            .swap_suggestions(original, slot, &existing, profile, level, theme)
            .await
    }

    /// Replace a slot's meal and fetch its recipe. Nothing changes on failure.
    pub async fn apply_swap(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        new_name: &str,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<WeeklyPlan, SwapError> {
        let fail = |source: PlannerError| SwapError {
            restored: plan.clone(),
            source,
        };

        let placeholder = plan
            .with_meal(day, slot, Meal::planned(new_name.trim()))
            .ok_or_else(|| fail(ValidationError::SlotNotPlanned { day, slot }.into()))?;
        let ensured = self
            .ensure_recipe(&placeholder, day, slot, profile, level)
            .await
            .map_err(fail)?;

        tracing::debug!(day = day.as_str(), slot = slot.as_str(), meal = new_name, "Swapped meal");
        Ok(ensured.plan)
    }

    fn lookup_cached(&self, name: &str, level: DifficultyLevel, profile_id: &str) -> Option<Recipe> {
        match self.cache.lookup(name, level, profile_id) {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!(meal = name, error = %e, "Recipe cache read failed");
                None
            }
        }
    }

    fn store_cached(&self, name: &str, level: DifficultyLevel, profile_id: &str, recipe: &Recipe) {
        if let Err(e) = self.cache.store(name, level, profile_id, recipe) {
            tracing::warn!(meal = name, error = %e, "Recipe cache write failed");
        }
    }
}

/// Unique lunch and dinner names in plan order, excluding `replacing`.
pub fn main_dish_names(plan: &WeeklyPlan, replacing: &str) -> Vec<String> {
    let replacing = normalize_meal_name(replacing);
    let mut seen = HashSet::new();
    plan.meals()
        .filter(|(_, slot, _)| slot.is_main())
        .map(|(_, _, meal)| meal.name().trim())
        .filter(|name| !name.is_empty())
        .filter(|name| {
            let key = normalize_meal_name(name);
            key != replacing && seen.insert(key)
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{RequestSequencer, RetryController, RetryPolicy};
    use crate::i18n::BuiltinTranslator;
    use crate::llm::{FakeProvider, Task};
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::types::{DayPlan, DinerCounts, Language};
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        fake: Arc<FakeProvider>,
        store: Arc<dyn KeyValueStore>,
        assembler: PlanAssembler,
    }

    fn harness(fake: FakeProvider) -> Harness {
        let fake = Arc::new(fake);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let gateway = GenerationGateway::new(
            fake.clone(),
            Arc::new(RequestSequencer::new(Duration::from_millis(500))),
            RetryController::new(RetryPolicy::default()),
            Arc::new(BuiltinTranslator::new(Language::En)),
        );
        let assembler = PlanAssembler::new(
            gateway,
            RecipeCache::new(store.clone()),
            FavoriteRecipes::new(store.clone()),
            RatingsStore::new(store.clone()),
        );
        Harness {
            fake,
            store,
            assembler,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "p1".to_string(),
            name: "Home".to_string(),
            diners: DinerCounts::default(),
            forbidden_foods: vec![],
            prioritize_favorites: false,
        }
    }

    fn options(length: CalendarLength) -> PlanOptions {
        PlanOptions {
            length,
            level: DifficultyLevel::Medium,
            theme: Theme::None,
            leftovers: false,
        }
    }

    fn day(names: [&str; 5]) -> DayPlan {
        DayPlan {
            breakfast: Meal::planned(names[0]),
            morning_snack: Meal::planned(names[1]),
            lunch: Meal::planned(names[2]),
            afternoon_snack: Meal::planned(names[3]),
            dinner: Meal::planned(names[4]),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_novel_week_takes_two_calls() {
        let h = harness(FakeProvider::with_demo_responses());
        let plan = h
            .assembler
            .generate_plan(&profile(), options(CalendarLength::SevenDays))
            .await
            .unwrap();

        assert_eq!(h.fake.call_count(), 2);
        assert_eq!(h.fake.calls_for(Task::RecipeBatch), 1);
        assert_eq!(plan.meals().count(), 35);
        assert!(plan.meals().all(|(_, _, meal)| meal.recipe().is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_recipes_skip_batch_call() {
        let h = harness(FakeProvider::with_demo_responses());
        h.assembler
            .generate_plan(&profile(), options(CalendarLength::SevenDays))
            .await
            .unwrap();
        let plan = h
            .assembler
            .generate_plan(&profile(), options(CalendarLength::SevenDays))
            .await
            .unwrap();

        assert_eq!(h.fake.calls_for(Task::WeeklySkeleton), 2);
        assert_eq!(h.fake.calls_for(Task::RecipeBatch), 1);
        assert!(plan.meals().all(|(_, _, meal)| meal.recipe().is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_day_plan_drops_weekend() {
        let h = harness(FakeProvider::with_demo_responses());
        let plan = h
            .assembler
            .generate_plan(&profile(), options(CalendarLength::FiveDays))
            .await
            .unwrap();

        assert!(plan.day(Weekday::Saturday).is_none());
        assert!(plan.day(Weekday::Sunday).is_none());
        assert_eq!(plan.days().count(), 5);
        // Weekend names are never sent for recipes.
        let batch = h
            .fake
            .calls()
            .into_iter()
            .find(|call| call.task == Task::RecipeBatch)
            .unwrap();
        assert!(!batch.user.contains("saturday"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_day_is_malformed() {
        let fake = FakeProvider::new().with_default_response(
            Task::WeeklySkeleton,
            r#"{"monday": {
                "breakfast": {"name": "Toast"},
                "morning_snack": {"name": "Apple"},
                "lunch": {"name": "Salad"},
                "afternoon_snack": {"name": "Nuts"},
                "dinner": {"name": "Soup"}
            }}"#,
        );
        let h = harness(fake);
        let err = h
            .assembler
            .generate_plan(&profile(), options(CalendarLength::FiveDays))
            .await
            .unwrap_err();

        assert!(matches!(err, PlannerError::MalformedResponse { .. }));
        assert_eq!(h.fake.call_count(), 1);
        assert!(h.store.keys_with_prefix("").unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_names_requested_once() {
        let h = harness(FakeProvider::with_demo_responses());
        let plan = WeeklyPlan::from_days([
            (Weekday::Monday, day(["Toast", "Apple", "Stew", "Nuts", "Soup"])),
            (Weekday::Tuesday, day([" toast ", "Apple", "STEW", "Nuts", "Soup"])),
        ]);

        let resolved = h
            .assembler
            .resolve_recipes(&plan, &profile(), DifficultyLevel::Easy)
            .await
            .unwrap();

        let batch = h.fake.calls().pop().unwrap();
        assert_eq!(batch.task, Task::RecipeBatch);
        assert!(batch.user.contains("5. Soup"));
        assert!(!batch.user.contains("6. "));
        assert!(resolved.meals().all(|(_, _, meal)| meal.recipe().is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ensure_recipe_uses_cache() {
        let h = harness(FakeProvider::with_demo_responses());
        let plan = WeeklyPlan::from_days([(
            Weekday::Monday,
            day(["Toast", "Apple", "Stew", "Nuts", "Soup"]),
        )]);

        let first = h
            .assembler
            .ensure_recipe(&plan, Weekday::Monday, MealSlot::Dinner, &profile(), DifficultyLevel::Easy)
            .await
            .unwrap();
        assert_eq!(first.recipe.name, "Soup");
        assert_eq!(
            first.plan.meal(Weekday::Monday, MealSlot::Dinner).unwrap().recipe(),
            Some(&first.recipe)
        );
        // The input plan is untouched.
        assert!(plan.meal(Weekday::Monday, MealSlot::Dinner).unwrap().is_pending());

        let second = h
            .assembler
            .ensure_recipe(&plan, Weekday::Monday, MealSlot::Dinner, &profile(), DifficultyLevel::Easy)
            .await
            .unwrap();
        assert_eq!(second.recipe, first.recipe);
        assert_eq!(h.fake.calls_for(Task::Recipe), 1);

        let err = h
            .assembler
            .ensure_recipe(&plan, Weekday::Friday, MealSlot::Dinner, &profile(), DifficultyLevel::Easy)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Validation(ValidationError::SlotNotPlanned { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_swap_restores_plan() {
        let fake = FakeProvider::with_demo_responses();
        fake.push_response(Task::Recipe, "not json");
        let h = harness(fake);
        let plan = WeeklyPlan::from_days([(
            Weekday::Monday,
            day(["Toast", "Apple", "Stew", "Nuts", "Soup"]),
        )]);

        let err = h
            .assembler
            .apply_swap(&plan, Weekday::Monday, MealSlot::Lunch, "Paella", &profile(), DifficultyLevel::Easy)
            .await
            .unwrap_err();
        assert_eq!(err.restored, plan);
        assert!(matches!(err.source, PlannerError::MalformedResponse { .. }));

        let swapped = h
            .assembler
            .apply_swap(&plan, Weekday::Monday, MealSlot::Lunch, " Paella ", &profile(), DifficultyLevel::Easy)
            .await
            .unwrap();
        let lunch = swapped.meal(Weekday::Monday, MealSlot::Lunch).unwrap();
        assert_eq!(lunch.name(), "Paella");
        assert!(lunch.recipe().is_some());
        assert_eq!(
            swapped.meal(Weekday::Monday, MealSlot::Dinner),
            plan.meal(Weekday::Monday, MealSlot::Dinner)
        );
    }

    #[test]
    fn test_main_dish_names_excludes_replaced_meal() {
        let plan = WeeklyPlan::from_days([
            (Weekday::Monday, day(["Toast", "Apple", "Stew", "Nuts", "Soup"])),
            (Weekday::Tuesday, day(["Toast", "Apple", "soup", "Nuts", "Paella"])),
        ]);
        assert_eq!(main_dish_names(&plan, "STEW"), vec!["Soup", "Paella"]);
    }
}
