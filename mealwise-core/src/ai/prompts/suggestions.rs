//! Swap suggestion prompt.

use super::{
    diners_text, list_or_none, theme_instruction, PromptSpec, SWAP_SUGGESTIONS_TEMPERATURE,
};
use crate::ai::schema;
use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::Task;
use crate::types::{DifficultyLevel, MealSlot, Theme, UserProfile};

/// Ask for alternatives to `original`, avoiding every name in `existing`.
pub fn render_swap_suggestions_prompt(
    translator: &dyn Translator,
    original: &str,
    slot: MealSlot,
    existing: &[String],
    profile: &UserProfile,
    level: DifficultyLevel,
    theme: Theme,
) -> PromptSpec {
    let args = TemplateArgs::new()
        .with("original", original)
        .with("slot", translator.text(TemplateKey::SlotName(slot)))
        .with("diners", diners_text(translator, &profile.diners))
        .with("forbidden", list_or_none(translator, &profile.forbidden_foods))
        .with("level", level.as_str())
        .with("theme", theme_instruction(translator, theme))
        .with("existing", list_or_none(translator, existing));

    PromptSpec {
        task: Task::SwapSuggestions,
        context: translator.render(
            TemplateKey::SuggestionsContext,
            &TemplateArgs::new().with("name", original),
        ),
        system: translator.text(TemplateKey::SuggestionSystem),
        user: translator.render(TemplateKey::SuggestionUser, &args),
        schema: schema::swap_suggestions().to_json(),
        temperature: SWAP_SUGGESTIONS_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::{DinerCounts, Language};

    #[test]
    fn test_suggestion_prompt() {
        let profile = UserProfile {
            id: "p1".to_string(),
            name: "Home".to_string(),
            diners: DinerCounts::default(),
            forbidden_foods: vec!["shellfish".to_string()],
            prioritize_favorites: false,
        };
        let spec = render_swap_suggestions_prompt(
            &BuiltinTranslator::new(Language::En),
            "Roast chicken",
            MealSlot::Dinner,
            &["Paella".to_string(), "Gazpacho".to_string()],
            &profile,
            DifficultyLevel::Easy,
            Theme::Light,
        );
        assert!(spec.user.contains("\"Roast chicken\", which is a dinner"));
        assert!(spec.user.contains("(do not repeat): Paella, Gazpacho"));
        assert!(spec.user.contains("shellfish"));
        assert!(spec.user.contains("Light & Healthy"));
        assert_eq!(spec.temperature, 0.8);
    }
}
