use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Language used for prompts, generated content and user-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" => Some(Language::Es),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }
}

/// Number of people eating, split by age bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DinerCounts {
    /// Ages 2-7.
    pub toddlers: u32,
    /// Ages 7-14.
    pub kids: u32,
    /// Ages 14-50.
    pub adults_under_50: u32,
    /// Ages 50 and over.
    pub adults_50_plus: u32,
}

/// A household profile that plans are generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub diners: DinerCounts,
    #[serde(default)]
    pub forbidden_foods: Vec<String>,
    #[serde(default)]
    pub prioritize_favorites: bool,
}

/// Profile fields supplied by the user before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub diners: DinerCounts,
    pub forbidden_foods: Vec<String>,
    pub prioritize_favorites: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(alias = "Fácil", alias = "Facil")]
    Easy,
    #[serde(alias = "Medio")]
    Medium,
    Chef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeCategory {
    #[serde(alias = "Proteína", alias = "Proteina")]
    Protein,
    #[serde(alias = "Hidratos")]
    Carbs,
    #[serde(alias = "Vegetal")]
    Vegetable,
    #[serde(alias = "Mixto")]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
}

/// A fully detailed recipe. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub complexity: Complexity,
    pub prep_time: String,
    pub category: RecipeCategory,
}

impl Recipe {
    /// Replace whatever id the model produced with a locally unique one.
    pub fn with_fresh_id(mut self) -> Self {
        self.id = format!("recipe_{}", Uuid::new_v4().simple());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
    ];

    /// Lunch and dinner; the slots swap suggestions must not repeat.
    pub fn is_main(&self) -> bool {
        matches!(self, MealSlot::Lunch | MealSlot::Dinner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning_snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon_snack",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// How many days a generated calendar covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarLength {
    FiveDays,
    #[default]
    SevenDays,
}

impl CalendarLength {
    pub fn days(&self) -> &'static [Weekday] {
        match self {
            CalendarLength::FiveDays => &Weekday::ALL[..5],
            CalendarLength::SevenDays => &Weekday::ALL,
        }
    }

    pub fn last_day(&self) -> Weekday {
        match self {
            CalendarLength::FiveDays => Weekday::Friday,
            CalendarLength::SevenDays => Weekday::Sunday,
        }
    }

    pub fn day_count(&self) -> usize {
        self.days().len()
    }
}

/// Difficulty tier that constrains recipe complexity during generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[serde(rename = "sencillo")]
    Easy,
    #[default]
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "pro")]
    Chef,
}

impl DifficultyLevel {
    /// Stable identifier, also used inside recipe cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "sencillo",
            DifficultyLevel::Medium => "medio",
            DifficultyLevel::Chef => "pro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sencillo" | "easy" => Some(DifficultyLevel::Easy),
            "medio" | "medium" => Some(DifficultyLevel::Medium),
            "pro" | "chef" => Some(DifficultyLevel::Chef),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    None,
    Comfort,
    Light,
    Mediterranean,
    Quick,
}

impl Theme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "ninguno" => Some(Theme::None),
            "comfort" | "reconfortante" => Some(Theme::Comfort),
            "light" | "ligera" => Some(Theme::Light),
            "mediterranean" | "mediterranea" => Some(Theme::Mediterranean),
            "quick" | "rapida" => Some(Theme::Quick),
            _ => None,
        }
    }
}

/// Case-fold and trim a meal name so incidental differences map to the same key.
pub fn normalize_meal_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A meal slot's content. A `Planned` meal has a name but no recipe yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MealRecord", into = "MealRecord")]
pub enum Meal {
    Planned { name: String },
    Detailed { name: String, recipe: Recipe },
}

/// Storage shape of a meal: `{"name": ..., "recipe": ...?}`.
#[derive(Serialize, Deserialize)]
struct MealRecord {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipe: Option<Recipe>,
}

impl From<MealRecord> for Meal {
    fn from(record: MealRecord) -> Self {
        match record.recipe {
            Some(recipe) => Meal::Detailed {
                name: record.name,
                recipe,
            },
            None => Meal::Planned { name: record.name },
        }
    }
}

impl From<Meal> for MealRecord {
    fn from(meal: Meal) -> Self {
        match meal {
            Meal::Planned { name } => MealRecord { name, recipe: None },
            Meal::Detailed { name, recipe } => MealRecord {
                name,
                recipe: Some(recipe),
            },
        }
    }
}

impl Meal {
    pub fn planned(name: impl Into<String>) -> Self {
        Meal::Planned { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Meal::Planned { name } | Meal::Detailed { name, .. } => name,
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match self {
            Meal::Planned { .. } => None,
            Meal::Detailed { recipe, .. } => Some(recipe),
        }
    }

    /// A named meal that still waits for its recipe.
    pub fn is_pending(&self) -> bool {
        matches!(self, Meal::Planned { name } if !name.trim().is_empty())
    }

    pub fn with_recipe(&self, recipe: Recipe) -> Self {
        Meal::Detailed {
            name: self.name().to_string(),
            recipe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub breakfast: Meal,
    pub morning_snack: Meal,
    pub lunch: Meal,
    pub afternoon_snack: Meal,
    pub dinner: Meal,
}

impl DayPlan {
    pub fn meal(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::MorningSnack => &self.morning_snack,
            MealSlot::Lunch => &self.lunch,
            MealSlot::AfternoonSnack => &self.afternoon_snack,
            MealSlot::Dinner => &self.dinner,
        }
    }

    fn meal_mut(&mut self, slot: MealSlot) -> &mut Meal {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::MorningSnack => &mut self.morning_snack,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::AfternoonSnack => &mut self.afternoon_snack,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> + '_ {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.meal(slot)))
    }
}

/// A week of meals keyed by day. Days absent from the map are not part of the plan.
///
/// Plans are values: every edit returns a new plan. Days are shared between
/// copies and only the edited day is cloned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, Arc<DayPlan>>,
}

impl WeeklyPlan {
    pub fn from_days(days: impl IntoIterator<Item = (Weekday, DayPlan)>) -> Self {
        Self {
            days: days
                .into_iter()
                .map(|(day, plan)| (day, Arc::new(plan)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day).map(Arc::as_ref)
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> + '_ {
        self.days.iter().map(|(day, plan)| (*day, plan.as_ref()))
    }

    pub fn meal(&self, day: Weekday, slot: MealSlot) -> Option<&Meal> {
        self.day(day).map(|plan| plan.meal(slot))
    }

    pub fn meals(&self) -> impl Iterator<Item = (Weekday, MealSlot, &Meal)> + '_ {
        self.days()
            .flat_map(|(day, plan)| plan.meals().map(move |(slot, meal)| (day, slot, meal)))
    }

    /// Return a copy with one slot replaced, or `None` if the day is not planned.
    pub fn with_meal(&self, day: Weekday, slot: MealSlot, meal: Meal) -> Option<Self> {
        let mut days = self.days.clone();
        let plan = days.get_mut(&day)?;
        *Arc::make_mut(plan).meal_mut(slot) = meal;
        Some(Self { days })
    }

    /// Return a copy that only keeps the days covered by `length`.
    pub fn truncated(&self, length: CalendarLength) -> Self {
        let keep = length.days();
        Self {
            days: self
                .days
                .iter()
                .filter(|(day, _)| keep.contains(day))
                .map(|(day, plan)| (*day, Arc::clone(plan)))
                .collect(),
        }
    }

    /// Unique names of meals that still lack a recipe, in plan order.
    pub fn pending_meal_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.meals()
            .filter(|(_, _, meal)| meal.is_pending())
            .filter(|(_, _, meal)| seen.insert(normalize_meal_name(meal.name())))
            .map(|(_, _, meal)| meal.name().to_string())
            .collect()
    }

    /// Attach recipes to pending meals. Days with nothing resolved are shared, not copied.
    pub fn fill_recipes(&self, mut resolve: impl FnMut(&str) -> Option<Recipe>) -> Self {
        let mut days = self.days.clone();
        for plan in days.values_mut() {
            let resolved: Vec<(MealSlot, Recipe)> = plan
                .meals()
                .filter(|(_, meal)| meal.is_pending())
                .filter_map(|(slot, meal)| resolve(meal.name()).map(|recipe| (slot, recipe)))
                .collect();

            if resolved.is_empty() {
                continue;
            }

            let plan = Arc::make_mut(plan);
            for (slot, recipe) in resolved {
                let meal = plan.meal_mut(slot);
                *meal = meal.with_recipe(recipe);
            }
        }
        Self { days }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub quantity: String,
    /// Category label as produced by the consolidation step.
    #[serde(default)]
    pub category: String,
}

/// Items sharing one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingGroup {
    pub category: String,
    pub items: Vec<ShoppingListItem>,
}

/// A consolidated shopping list, grouped and ordered by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub groups: Vec<ShoppingGroup>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.items.is_empty())
    }

    pub fn items(&self) -> impl Iterator<Item = &ShoppingListItem> + '_ {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    pub fn categories(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.category.as_str())
            .collect()
    }
}

/// A saved weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub profile_id: String,
    pub plan: WeeklyPlan,
    pub level: DifficultyLevel,
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopping_list: Option<ShoppingList>,
}

/// A quick recipe idea with a one-line pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickIdea {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(prefix: &str) -> DayPlan {
        DayPlan {
            breakfast: Meal::planned(format!("{prefix} breakfast")),
            morning_snack: Meal::planned(format!("{prefix} snack")),
            lunch: Meal::planned(format!("{prefix} lunch")),
            afternoon_snack: Meal::planned(format!("{prefix} snack")),
            dinner: Meal::planned(format!("{prefix} dinner")),
        }
    }

    fn recipe(name: &str) -> Recipe {
        Recipe {
            id: "r1".to_string(),
            name: name.to_string(),
            instructions: vec!["Cook".to_string()],
            ingredients: vec![Ingredient {
                name: "egg".to_string(),
                quantity: "2".to_string(),
            }],
            complexity: Complexity::Easy,
            prep_time: "10 min".to_string(),
            category: RecipeCategory::Protein,
        }
    }

    #[test]
    fn test_meal_storage_shape() {
        let planned = serde_json::to_value(Meal::planned("Soup")).unwrap();
        assert_eq!(planned, serde_json::json!({"name": "Soup"}));

        let detailed = Meal::planned("Soup").with_recipe(recipe("Soup"));
        let value = serde_json::to_value(&detailed).unwrap();
        assert_eq!(value["recipe"]["prepTime"], "10 min");

        let back: Meal = serde_json::from_value(value).unwrap();
        assert_eq!(back, detailed);
    }

    #[test]
    fn test_recipe_accepts_spanish_enum_labels() {
        let json = r#"{"name":"Tortilla","instructions":[],"ingredients":[],
            "complexity":"Fácil","prepTime":"20 min","category":"Proteína"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.complexity, Complexity::Easy);
        assert_eq!(recipe.category, RecipeCategory::Protein);
        assert!(recipe.id.is_empty());
    }

    #[test]
    fn test_with_meal_leaves_original_untouched() {
        let plan = WeeklyPlan::from_days([(Weekday::Monday, day("mon")), (Weekday::Tuesday, day("tue"))]);
        let edited = plan
            .with_meal(Weekday::Monday, MealSlot::Lunch, Meal::planned("Paella"))
            .unwrap();

        assert_eq!(plan.meal(Weekday::Monday, MealSlot::Lunch).unwrap().name(), "mon lunch");
        assert_eq!(edited.meal(Weekday::Monday, MealSlot::Lunch).unwrap().name(), "Paella");
        assert_eq!(plan.day(Weekday::Tuesday), edited.day(Weekday::Tuesday));
        assert!(plan.with_meal(Weekday::Sunday, MealSlot::Lunch, Meal::planned("x")).is_none());
    }

    #[test]
    fn test_truncated_drops_weekend() {
        let plan = WeeklyPlan::from_days(Weekday::ALL.map(|d| (d, day(d.as_str()))));
        let short = plan.truncated(CalendarLength::FiveDays);
        assert!(short.day(Weekday::Saturday).is_none());
        assert!(short.day(Weekday::Sunday).is_none());
        assert_eq!(short.days().count(), 5);
    }

    #[test]
    fn test_pending_meal_names_are_unique() {
        let plan = WeeklyPlan::from_days([(Weekday::Monday, day("mon"))]);
        // Both snacks share a name.
        assert_eq!(plan.pending_meal_names().len(), 4);

        let filled = plan.fill_recipes(|name| (name == "mon snack").then(|| recipe(name)));
        assert_eq!(filled.pending_meal_names().len(), 3);
        assert!(filled
            .meal(Weekday::Monday, MealSlot::AfternoonSnack)
            .unwrap()
            .recipe()
            .is_some());
    }

    #[test]
    fn test_weekly_plan_serializes_as_day_map() {
        let plan = WeeklyPlan::from_days([(Weekday::Friday, day("fri"))]);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["friday"]["dinner"]["name"], "fri dinner");
    }
}
