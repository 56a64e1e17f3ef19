use super::{Template, TemplateArgs, TemplateKey};
use crate::types::{MealSlot, Weekday};

pub(super) fn template(key: TemplateKey) -> Template {
    use Template::{Render, Text};

    match key {
        TemplateKey::ApiKeyMissing => Text("The content generation API key is not configured."),
        TemplateKey::RateLimitError => Text(
            "You have exceeded the API request limit. Please wait a few minutes and try again.",
        ),
        TemplateKey::EmptyResponseError => Render(|a: &TemplateArgs| {
            format!(
                "The AI did not generate content while {}. The response was empty.",
                a.get("context")
            )
        }),
        TemplateKey::GenericApiError => Render(|a: &TemplateArgs| {
            format!(
                "An unexpected error occurred while {}. Please try again.",
                a.get("context")
            )
        }),
        TemplateKey::StorageError => Text("Your data could not be saved locally."),
        TemplateKey::RetryNotice => Render(|a: &TemplateArgs| {
            format!(
                "Request limit reached. Retrying in {} seconds...",
                a.get("seconds")
            )
        }),
        TemplateKey::CalendarNameEmpty => Text("The menu name cannot be empty."),
        TemplateKey::CalendarNameExists => Render(|a: &TemplateArgs| {
            format!("A menu with the name \"{}\" already exists.", a.get("name"))
        }),
        TemplateKey::NoActiveProfile => Text("Please select a profile first."),
        TemplateKey::RatingOutOfRange => Render(|a: &TemplateArgs| {
            format!("Invalid rating {}. It must be between 1 and 5.", a.get("value"))
        }),
        TemplateKey::ProfileNameEmpty => Text("Profile name is required."),
        TemplateKey::TooManyProfiles => Render(|a: &TemplateArgs| {
            format!("You can create at most {} profiles.", a.get("max"))
        }),
        TemplateKey::UnknownProfile => Text("The profile for this menu was not found."),
        TemplateKey::UnknownCalendar => Text("That menu no longer exists."),
        TemplateKey::SlotUnavailable => Text("That meal cannot be changed right now."),

        TemplateKey::WeeklyPlanContext => Text("generating the weekly menu"),
        TemplateKey::RecipeContext => Render(|a: &TemplateArgs| {
            format!("generating the recipe for \"{}\"", a.get("name"))
        }),
        TemplateKey::RecipeBatchContext => {
            Render(|a: &TemplateArgs| format!("generating {} recipes", a.get("count")))
        }
        TemplateKey::ShoppingListContext => Text("generating the shopping list"),
        TemplateKey::RescueContext => Text("generating a recipe in rescue mode"),
        TemplateKey::QuickIdeasContext => {
            Render(|a: &TemplateArgs| format!("generating ideas for {}", a.get("meal_type")))
        }
        TemplateKey::SuggestionsContext => Render(|a: &TemplateArgs| {
            format!("generating suggestions for \"{}\"", a.get("name"))
        }),

        TemplateKey::None => Text("none"),
        TemplateKey::DayName(day) => Text(match day {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }),
        TemplateKey::SlotName(slot) => Text(match slot {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon snack",
            MealSlot::Dinner => "dinner",
        }),
        TemplateKey::DinerBreakdown => Render(|a: &TemplateArgs| {
            format!(
                "Kids (2-7): {}, Kids (7-14): {}, Adults (14-50): {}, Adults (50+): {}",
                a.get("toddlers"),
                a.get("kids"),
                a.get("adults_under_50"),
                a.get("adults_50_plus")
            )
        }),
        TemplateKey::DifficultyEasy => Text("All recipes must be 'Easy' level."),
        TemplateKey::DifficultyMedium => Text(
            "Mix 'Easy' and 'Medium' recipes. Do NOT include any 'Chef' recipes. \
             Keep breakfasts and snacks simple.",
        ),
        TemplateKey::DifficultyChef => Text(
            "Any level is allowed: 'Easy', 'Medium' and 'Chef'. Some challenging 'Chef' \
             dishes are welcome, especially for dinners, balanced with simpler meals.",
        ),
        TemplateKey::ThemeComfort => Text(
            "THEME: \"Comfort Food\". Homemade, warm and satisfying dishes such as stews, \
             creamy soups, hearty pasta and roasts.",
        ),
        TemplateKey::ThemeLight => Text(
            "THEME: \"Light & Healthy\". Salads, vegetables, lean proteins and steamed, grilled \
             or baked dishes. Avoid fried food and heavy sauces.",
        ),
        TemplateKey::ThemeMediterranean => Text(
            "THEME: \"Mediterranean\". Olive oil, fresh vegetables, legumes, fish and whole grains.",
        ),
        TemplateKey::ThemeQuick => Text(
            "THEME: \"Quick\". Every recipe must be ready in under 30 minutes with few cooking steps.",
        ),
        TemplateKey::LeftoverHint => Text(
            "LEFTOVER WIZARD: plan dinners so their leftovers become the next day's lunch \
             (e.g. roast chicken, then chicken tacos). You may say so in the dish name, \
             like \"Chicken tacos (roast leftovers)\".",
        ),
        TemplateKey::FavoritesHint => Render(|a: &TemplateArgs| {
            format!(
                "PRIORITY: include some of the user's favorite recipes where they fit: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::HighlyRatedHint => Render(|a: &TemplateArgs| {
            format!(
                "HIGH PRIORITY: the user LOVES these recipes (rated 4-5 stars). Include some \
                 of them or very similar dishes: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::PoorlyRatedHint => Render(|a: &TemplateArgs| {
            format!(
                "HIGHEST PRIORITY: the user HATES these recipes (rated 1-2 stars). Never \
                 include them or anything resembling them: {}.",
                a.get("recipes")
            )
        }),
        TemplateKey::CategoryOther => Text("Other"),

        TemplateKey::WeeklyPlanSystem => Text(
            "Act as an expert chef and nutritionist. Create a varied, balanced and delicious \
             weekly meal plan for the user's household. ALWAYS answer in JSON using the \
             provided schema. Dish names must be appealing and descriptive.",
        ),
        TemplateKey::WeeklyPlanUser => Render(|a: &TemplateArgs| {
            format!(
                "Generate only the NAMES of the dishes for a {days}-day meal plan (Monday to \
                 {end_day}) in English. Do NOT include recipes.\n\n\
                 {hints}\n\
                 Household:\n\
                 - Diners: {diners}\n\
                 - Forbidden foods (never use them): {forbidden}\n\
                 - Difficulty: {difficulty}\n\
                 {theme}\n\
                 {leftovers}",
                days = a.get("days"),
                end_day = a.get("end_day"),
                hints = a.get("hints"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                difficulty = a.get("difficulty"),
                theme = a.get("theme"),
                leftovers = a.get("leftovers"),
            )
        }),
        TemplateKey::RecipeSystem => Text(
            "Act as an expert chef. Write detailed, delicious recipes. ALWAYS answer in JSON \
             using the schema. Rate complexity as 'Easy' (few steps, basic technique), \
             'Medium' (several components or techniques) or 'Chef' (advanced technique or \
             long preparation).",
        ),
        TemplateKey::RecipeUser => Render(|a: &TemplateArgs| {
            format!(
                "Write a recipe for the dish \"{name}\".\n\
                 - Diners: {diners}\n\
                 - Forbidden foods (never use them): {forbidden}\n\
                 - Requested difficulty level: {level}\n\
                 Scale the quantities to the diners.",
                name = a.get("name"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
            )
        }),
        TemplateKey::RecipeBatchUser => Render(|a: &TemplateArgs| {
            format!(
                "Write a recipe for EACH of the following dishes:\n{meals}\n\n\
                 - Diners: {diners}\n\
                 - Forbidden foods (never use them): {forbidden}\n\
                 - Requested difficulty level: {level}\n\
                 Return one entry per dish and copy each dish name exactly into \"mealName\".",
                meals = a.get("meals"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
            )
        }),
        TemplateKey::ShoppingListSystem => Text(
            "Act as an extremely efficient shopping assistant. Consolidate the ingredient \
             list, assign every item to one supermarket category and return a clean shopping \
             list. ALWAYS answer in JSON. Category names must be in English.",
        ),
        TemplateKey::ShoppingListUser => Render(|a: &TemplateArgs| {
            format!(
                "Build a shopping list from these ingredients of a weekly menu. Merge duplicate \
                 ingredients and add up their quantities. Answer only with the JSON array.\n\n{}",
                a.get("ingredients")
            )
        }),
        TemplateKey::RescueSystem => Text(
            "Act as a creative, resourceful chef. Create a feasible recipe using ONLY the \
             ingredients the user lists, plus basics such as oil, salt, pepper and water. \
             Write it in English. ALWAYS answer in JSON.",
        ),
        TemplateKey::RescueUser => Render(|a: &TemplateArgs| {
            format!(
                "I have these ingredients: {}. Create a complete recipe with a creative name.",
                a.get("ingredients")
            )
        }),
        TemplateKey::QuickIdeasSystem => Text(
            "Act as a quick, creative cooking idea generator. Suggest 3 simple recipe ideas, \
             each with a name and a short enticing description (1-2 sentences). Write in \
             English. ALWAYS answer in JSON.",
        ),
        TemplateKey::QuickIdeasUser => Render(|a: &TemplateArgs| {
            format!(
                "I need 3 quick ideas for {}. Return them as a JSON array of objects with \
                 \"name\" and \"description\".",
                a.get("meal_type")
            )
        }),
        TemplateKey::SuggestionSystem => Text(
            "You are an expert menu planning assistant. Suggest 3 alternative dishes that add \
             variety, especially of protein, to an existing weekly menu without repeating what \
             is already planned. ALWAYS answer in JSON.",
        ),
        TemplateKey::SuggestionUser => Render(|a: &TemplateArgs| {
            format!(
                "I want 3 alternatives for \"{original}\", which is a {slot}. They must be \
                 genuinely different, vary the protein (fish, red meat, legumes...) and avoid \
                 repeating main ingredients of other dishes.\n\
                 - Diners: {diners}\n\
                 - Forbidden foods (never use them): {forbidden}\n\
                 - Recipe difficulty level: {level}\n\
                 {theme}\n\
                 - Dishes already on the menu (do not repeat): {existing}",
                original = a.get("original"),
                slot = a.get("slot"),
                diners = a.get("diners"),
                forbidden = a.get("forbidden"),
                level = a.get("level"),
                theme = a.get("theme"),
                existing = a.get("existing"),
            )
        }),
    }
}
