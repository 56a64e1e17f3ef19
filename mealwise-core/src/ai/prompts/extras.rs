//! Rescue-mode and quick idea prompts.

use super::{PromptSpec, QUICK_IDEAS_TEMPERATURE, RESCUE_TEMPERATURE};
use crate::ai::schema;
use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::Task;

/// A recipe built only from what the user has at hand.
pub fn render_rescue_prompt(translator: &dyn Translator, ingredients: &str) -> PromptSpec {
    PromptSpec {
        task: Task::RescueRecipe,
        context: translator.text(TemplateKey::RescueContext),
        system: translator.text(TemplateKey::RescueSystem),
        user: translator.render(
            TemplateKey::RescueUser,
            &TemplateArgs::new().with("ingredients", ingredients.trim()),
        ),
        schema: schema::recipe().to_json(),
        temperature: RESCUE_TEMPERATURE,
    }
}

pub fn render_quick_ideas_prompt(translator: &dyn Translator, meal_type: &str) -> PromptSpec {
    let args = TemplateArgs::new().with("meal_type", meal_type.trim());
    PromptSpec {
        task: Task::QuickIdeas,
        context: translator.render(TemplateKey::QuickIdeasContext, &args),
        system: translator.text(TemplateKey::QuickIdeasSystem),
        user: translator.render(TemplateKey::QuickIdeasUser, &args),
        schema: schema::quick_ideas().to_json(),
        temperature: QUICK_IDEAS_TEMPERATURE,
    }
}
