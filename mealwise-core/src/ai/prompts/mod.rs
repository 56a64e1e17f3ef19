//! Prompt builders.
//!
//! Each builder returns a [`PromptSpec`] holding the localized prompt text,
//! the response schema and the task's fixed temperature.

pub mod extras;
pub mod recipe;
pub mod shopping_list;
pub mod suggestions;
pub mod weekly_plan;

pub use extras::{render_quick_ideas_prompt, render_rescue_prompt};
pub use recipe::{render_recipe_batch_prompt, render_recipe_prompt};
pub use shopping_list::render_shopping_list_prompt;
pub use suggestions::render_swap_suggestions_prompt;
pub use weekly_plan::{render_weekly_plan_prompt, PreferenceSignals, WeeklyPlanRequest};

use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::{GenerationRequest, Task};
use crate::types::{DifficultyLevel, DinerCounts, Theme};

pub const WEEKLY_SKELETON_TEMPERATURE: f32 = 0.7;
pub const RECIPE_TEMPERATURE: f32 = 0.5;
pub const RECIPE_BATCH_TEMPERATURE: f32 = 0.5;
pub const SHOPPING_LIST_TEMPERATURE: f32 = 0.2;
pub const RESCUE_TEMPERATURE: f32 = 0.8;
pub const QUICK_IDEAS_TEMPERATURE: f32 = 0.9;
pub const SWAP_SUGGESTIONS_TEMPERATURE: f32 = 0.8;

/// A fully rendered prompt, ready to send.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub task: Task,
    /// Localized description of the task, used in error messages.
    pub context: String,
    pub system: String,
    pub user: String,
    pub schema: serde_json::Value,
    pub temperature: f32,
}

impl PromptSpec {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            task: self.task,
            system: self.system.clone(),
            user: self.user.clone(),
            schema: self.schema.clone(),
            temperature: self.temperature,
        }
    }
}

fn diners_text(translator: &dyn Translator, diners: &DinerCounts) -> String {
    translator.render(
        TemplateKey::DinerBreakdown,
        &TemplateArgs::new()
            .with("toddlers", diners.toddlers)
            .with("kids", diners.kids)
            .with("adults_under_50", diners.adults_under_50)
            .with("adults_50_plus", diners.adults_50_plus),
    )
}

/// Comma-separated list, or the localized "none".
fn list_or_none(translator: &dyn Translator, items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        translator.text(TemplateKey::None)
    } else {
        items.join(", ")
    }
}

fn level_instruction(translator: &dyn Translator, level: DifficultyLevel) -> String {
    translator.text(match level {
        DifficultyLevel::Easy => TemplateKey::DifficultyEasy,
        DifficultyLevel::Medium => TemplateKey::DifficultyMedium,
        DifficultyLevel::Chef => TemplateKey::DifficultyChef,
    })
}

fn theme_instruction(translator: &dyn Translator, theme: Theme) -> String {
    let key = match theme {
        Theme::None => return String::new(),
        Theme::Comfort => TemplateKey::ThemeComfort,
        Theme::Light => TemplateKey::ThemeLight,
        Theme::Mediterranean => TemplateKey::ThemeMediterranean,
        Theme::Quick => TemplateKey::ThemeQuick,
    };
    translator.text(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::Language;

    #[test]
    fn test_list_or_none() {
        let t = BuiltinTranslator::new(Language::Es);
        assert_eq!(list_or_none(&t, &[]), "ninguno");
        assert_eq!(
            list_or_none(&t, &["nuts".to_string(), " ".to_string(), "milk".to_string()]),
            "nuts, milk"
        );
    }

    #[test]
    fn test_no_theme_is_blank() {
        let t = BuiltinTranslator::new(Language::En);
        assert!(theme_instruction(&t, Theme::None).is_empty());
        assert!(theme_instruction(&t, Theme::Quick).contains("30 minutes"));
    }
}
