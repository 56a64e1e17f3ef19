//! Text templates for prompts and user-facing messages.
//!
//! A template is either constant text or a pure function of named arguments.
//! Callers render through a [`Translator`], which picks the catalog for the
//! active language.

mod en;
mod es;

use std::collections::BTreeMap;

use crate::types::{Language, MealSlot, Weekday};

/// Identifies one piece of text in the catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    // Errors and notices
    ApiKeyMissing,
    RateLimitError,
    EmptyResponseError,
    GenericApiError,
    StorageError,
    RetryNotice,
    CalendarNameEmpty,
    CalendarNameExists,
    NoActiveProfile,
    RatingOutOfRange,
    ProfileNameEmpty,
    TooManyProfiles,
    UnknownProfile,
    UnknownCalendar,
    SlotUnavailable,

    // Task descriptions used in error messages
    WeeklyPlanContext,
    RecipeContext,
    RecipeBatchContext,
    ShoppingListContext,
    RescueContext,
    QuickIdeasContext,
    SuggestionsContext,

    // Prompt fragments
    None,
    DayName(Weekday),
    SlotName(MealSlot),
    DinerBreakdown,
    DifficultyEasy,
    DifficultyMedium,
    DifficultyChef,
    ThemeComfort,
    ThemeLight,
    ThemeMediterranean,
    ThemeQuick,
    LeftoverHint,
    FavoritesHint,
    HighlyRatedHint,
    PoorlyRatedHint,
    CategoryOther,

    // Prompts
    WeeklyPlanSystem,
    WeeklyPlanUser,
    RecipeSystem,
    RecipeUser,
    RecipeBatchUser,
    ShoppingListSystem,
    ShoppingListUser,
    RescueSystem,
    RescueUser,
    QuickIdeasSystem,
    QuickIdeasUser,
    SuggestionSystem,
    SuggestionUser,
}

/// Named interpolation values for a [`Template::Render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateArgs {
    values: BTreeMap<&'static str, String>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.values.insert(name, value.to_string());
        self
    }

    /// Value for `name`, or an empty string when it was not supplied.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

#[derive(Clone, Copy)]
pub enum Template {
    Text(&'static str),
    Render(fn(&TemplateArgs) -> String),
}

impl Template {
    pub fn render(&self, args: &TemplateArgs) -> String {
        match self {
            Template::Text(text) => (*text).to_string(),
            Template::Render(render) => render(args),
        }
    }
}

/// Source of localized templates.
pub trait Translator: Send + Sync {
    fn language(&self) -> Language;

    fn template(&self, key: TemplateKey) -> Template;

    fn render(&self, key: TemplateKey, args: &TemplateArgs) -> String {
        self.template(key).render(args)
    }

    fn text(&self, key: TemplateKey) -> String {
        self.render(key, &TemplateArgs::new())
    }
}

/// Translator backed by the catalogs compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTranslator {
    language: Language,
}

impl BuiltinTranslator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Translator for BuiltinTranslator {
    fn language(&self) -> Language {
        self.language
    }

    fn template(&self, key: TemplateKey) -> Template {
        match self.language {
            Language::Es => es::template(key),
            Language::En => en::template(key),
        }
    }
}
