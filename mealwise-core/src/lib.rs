pub mod ai;
pub mod error;
pub mod i18n;
pub mod llm;
pub mod planner;
pub mod shopping;
pub mod store;
pub mod types;

pub use ai::{AiConfig, ConfigError, GenerationGateway, PlannerConfig, RequestSequencer};
pub use error::{PlannerError, ValidationError};
pub use i18n::{BuiltinTranslator, Translator};
pub use llm::{create_provider, create_provider_from_env, GenerationService, LlmError};
pub use planner::{EnsuredRecipe, MealPlanner, PlanOptions, SavedCalendar, SwapError};
pub use shopping::{ShoppingCategory, ShoppingListAggregator, ShoppingOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore, NewCalendar, StoreError};
pub use types::{
    Calendar, CalendarLength, DayPlan, DifficultyLevel, DinerCounts, Ingredient, Language, Meal,
    MealSlot, NewProfile, QuickIdea, Recipe, ShoppingList, ShoppingListItem, Theme, UserProfile,
    Weekday, WeeklyPlan,
};
