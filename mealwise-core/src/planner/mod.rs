//! The operations a meal-planning front end calls.
//!
//! [`MealPlanner`] wires the generation gateway, the assembler, the shopping
//! aggregator and the local stores together. It is cheap to clone; clones
//! share the request lane, the stores and the in-flight slot markers.

pub mod assembler;
mod in_flight;
mod signals;

pub use assembler::{main_dish_names, EnsuredRecipe, PlanAssembler, PlanOptions, SwapError};
pub use in_flight::{InFlightSlots, SlotGuard};
pub use signals::{collect_signals, HIGH_RATING, LOW_RATING};

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::ai::{
    AiConfig, GenerationGateway, PlannerConfig, RequestSequencer, RetryController, RetryPolicy,
};
use crate::error::{PlannerError, ValidationError};
use crate::i18n::{BuiltinTranslator, Translator};
use crate::llm::{create_provider, GenerationService};
use crate::shopping::{ShoppingListAggregator, ShoppingOutcome};
use crate::store::{
    CalendarHistory, FavoriteRecipes, FileStore, KeyValueStore, NewCalendar, ProfileStore,
    RatingsStore, RecipeCache,
};
use crate::types::{
    Calendar, DifficultyLevel, MealSlot, QuickIdea, Recipe, ShoppingList, Theme, UserProfile,
    Weekday, WeeklyPlan,
};

/// A freshly saved calendar and the task building its shopping list.
#[derive(Debug)]
pub struct SavedCalendar {
    pub calendar: Calendar,
    /// Completes once the list is attached or the attempt is abandoned.
    /// Dropping the handle does not cancel the task.
    pub shopping_list_task: JoinHandle<()>,
}

#[derive(Debug, Clone)]
pub struct MealPlanner {
    gateway: GenerationGateway,
    assembler: PlanAssembler,
    shopping: ShoppingListAggregator,
    profiles: ProfileStore,
    favorites: FavoriteRecipes,
    ratings: RatingsStore,
    calendars: CalendarHistory,
    cache: RecipeCache,
    in_flight: InFlightSlots,
}

impl MealPlanner {
    /// Build a planner. Must be called inside a tokio runtime, which hosts
    /// the request lane.
    pub fn new(
        service: Arc<dyn GenerationService>,
        store: Arc<dyn KeyValueStore>,
        config: &PlannerConfig,
    ) -> Self {
        tracing::debug!(
            provider = service.provider_name(),
            model = service.model_name(),
            language = config.language.as_str(),
            "Creating meal planner"
        );
        let gateway = GenerationGateway::new(
            service,
            Arc::new(RequestSequencer::new(config.queue_cooldown)),
            RetryController::new(RetryPolicy::from_config(config)),
            Arc::new(BuiltinTranslator::new(config.language)),
        );
        Self::with_gateway(gateway, store)
    }

    pub fn with_gateway(gateway: GenerationGateway, store: Arc<dyn KeyValueStore>) -> Self {
        let cache = RecipeCache::new(Arc::clone(&store));
        let favorites = FavoriteRecipes::new(Arc::clone(&store));
        let ratings = RatingsStore::new(Arc::clone(&store));
        let assembler = PlanAssembler::new(
            gateway.clone(),
            cache.clone(),
            favorites.clone(),
            ratings.clone(),
        );

        Self {
            shopping: ShoppingListAggregator::new(assembler.clone()),
            profiles: ProfileStore::new(Arc::clone(&store)),
            calendars: CalendarHistory::new(store),
            gateway,
            assembler,
            favorites,
            ratings,
            cache,
            in_flight: InFlightSlots::new(),
        }
    }

    /// Build a planner from environment variables, storing data under
    /// `MEALWISE_DATA_DIR`.
    ///
    /// See [`AiConfig::from_env`] and [`PlannerConfig::from_env`].
    pub fn from_env() -> Result<Self, PlannerError> {
        let ai = AiConfig::from_env().map_err(|e| PlannerError::Configuration(e.to_string()))?;
        let config =
            PlannerConfig::from_env().map_err(|e| PlannerError::Configuration(e.to_string()))?;
        let service =
            create_provider(&ai).map_err(|e| PlannerError::Configuration(e.to_string()))?;
        let store = Arc::new(FileStore::new(&config.data_dir));
        Ok(Self::new(service, store, &config))
    }

    pub fn translator(&self) -> &dyn Translator {
        self.gateway.translator()
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn favorites(&self) -> &FavoriteRecipes {
        &self.favorites
    }

    pub fn ratings(&self) -> &RatingsStore {
        &self.ratings
    }

    pub fn calendars(&self) -> &CalendarHistory {
        &self.calendars
    }

    pub fn recipe_cache(&self) -> &RecipeCache {
        &self.cache
    }

    pub fn in_flight(&self) -> &InFlightSlots {
        &self.in_flight
    }

    pub fn active_profile(&self) -> Result<UserProfile, PlannerError> {
        self.profiles.require_active()
    }

    pub fn rate_recipe(&self, recipe_id: &str, value: i64) -> Result<(), PlannerError> {
        self.ratings.set_rating(recipe_id, value)
    }

    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
        options: PlanOptions,
    ) -> Result<WeeklyPlan, PlannerError> {
        self.assembler.generate_plan(profile, options).await
    }

    /// Fails with [`ValidationError::SlotBusy`] while another edit of the
    /// same slot is running.
    pub async fn ensure_recipe(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<EnsuredRecipe, PlannerError> {
        let _guard = self.in_flight.acquire(day, slot)?;
        self.assembler
            .ensure_recipe(plan, day, slot, profile, level)
            .await
    }

    pub async fn request_swap_suggestions(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        profile: &UserProfile,
        level: DifficultyLevel,
        theme: Theme,
    ) -> Result<Vec<String>, PlannerError> {
        self.assembler
            .swap_suggestions(plan, day, slot, profile, level, theme)
            .await
    }

    pub async fn apply_swap(
        &self,
        plan: &WeeklyPlan,
        day: Weekday,
        slot: MealSlot,
        new_name: &str,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<WeeklyPlan, SwapError> {
        let _guard = self.in_flight.acquire(day, slot).map_err(|e| SwapError {
            restored: plan.clone(),
            source: e.into(),
        })?;
        self.assembler
            .apply_swap(plan, day, slot, new_name, profile, level)
            .await
    }

    pub async fn generate_shopping_list(
        &self,
        plan: &WeeklyPlan,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<ShoppingOutcome, PlannerError> {
        self.shopping.build(plan, profile, level).await
    }

    /// The list stored on the calendar, building and storing one if missing.
    pub async fn shopping_list_for_calendar(
        &self,
        calendar_id: &str,
    ) -> Result<ShoppingList, PlannerError> {
        let calendar = self
            .calendars
            .get(calendar_id)?
            .ok_or_else(|| ValidationError::UnknownCalendar(calendar_id.to_string()))?;
        if let Some(list) = calendar.shopping_list {
            return Ok(list);
        }

        let profile = self.profile(&calendar.profile_id)?;
        let outcome = self
            .shopping
            .build(&calendar.plan, &profile, calendar.level)
            .await?;
        self.calendars.attach_shopping_list(
            &calendar.id,
            &calendar.plan,
            outcome.plan,
            outcome.list.clone(),
        )?;
        Ok(outcome.list)
    }

    /// Persist a calendar, then build its shopping list in the background.
    pub fn save_calendar(&self, new: NewCalendar) -> Result<SavedCalendar, PlannerError> {
        let profile = self.profile(&new.profile_id)?;
        let calendar = self.calendars.add(new)?;
        let shopping_list_task = self.spawn_shopping_list(calendar.clone(), profile);
        Ok(SavedCalendar {
            calendar,
            shopping_list_task,
        })
    }

    fn spawn_shopping_list(&self, calendar: Calendar, profile: UserProfile) -> JoinHandle<()> {
        let shopping = self.shopping.clone();
        let calendars = self.calendars.clone();

        tokio::spawn(async move {
            let outcome = match shopping.build(&calendar.plan, &profile, calendar.level).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(calendar_id = %calendar.id, error = %e, "Background shopping list failed");
                    return;
                }
            };

            match calendars.attach_shopping_list(
                &calendar.id,
                &calendar.plan,
                outcome.plan,
                outcome.list,
            ) {
                Ok(true) => tracing::debug!(calendar_id = %calendar.id, "Attached shopping list"),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(calendar_id = %calendar.id, error = %e, "Failed to store shopping list");
                }
            }
        })
    }

    pub async fn quick_ideas(&self, meal_type: &str) -> Result<Vec<QuickIdea>, PlannerError> {
        self.gateway.quick_ideas(meal_type).await
    }

    /// A recipe using only what is on hand.
    pub async fn recipe_from_ingredients(&self, ingredients: &str) -> Result<Recipe, PlannerError> {
        self.gateway.rescue_recipe(ingredients).await
    }

    fn profile(&self, id: &str) -> Result<UserProfile, PlannerError> {
        self.profiles
            .get(id)?
            .ok_or_else(|| ValidationError::UnknownProfile(id.to_string()).into())
    }
}
