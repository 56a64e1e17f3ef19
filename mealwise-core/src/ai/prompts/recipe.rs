//! Recipe prompts, single and batched.

use super::{diners_text, list_or_none, PromptSpec, RECIPE_BATCH_TEMPERATURE, RECIPE_TEMPERATURE};
use crate::ai::schema;
use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::Task;
use crate::types::{DifficultyLevel, UserProfile};

pub fn render_recipe_prompt(
    translator: &dyn Translator,
    meal_name: &str,
    profile: &UserProfile,
    level: DifficultyLevel,
) -> PromptSpec {
    let args = TemplateArgs::new()
        .with("name", meal_name)
        .with("diners", diners_text(translator, &profile.diners))
        .with("forbidden", list_or_none(translator, &profile.forbidden_foods))
        .with("level", level.as_str());

    PromptSpec {
        task: Task::Recipe,
        context: translator.render(
            TemplateKey::RecipeContext,
            &TemplateArgs::new().with("name", meal_name),
        ),
        system: translator.text(TemplateKey::RecipeSystem),
        user: translator.render(TemplateKey::RecipeUser, &args),
        schema: schema::recipe().to_json(),
        temperature: RECIPE_TEMPERATURE,
    }
}

/// One prompt covering every name in `meal_names`, listed as `1. name` lines.
pub fn render_recipe_batch_prompt(
    translator: &dyn Translator,
    meal_names: &[String],
    profile: &UserProfile,
    level: DifficultyLevel,
) -> PromptSpec {
    let meals = meal_names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    let args = TemplateArgs::new()
        .with("meals", meals)
        .with("diners", diners_text(translator, &profile.diners))
        .with("forbidden", list_or_none(translator, &profile.forbidden_foods))
        .with("level", level.as_str());

    PromptSpec {
        task: Task::RecipeBatch,
        context: translator.render(
            TemplateKey::RecipeBatchContext,
            &TemplateArgs::new().with("count", meal_names.len()),
        ),
        system: translator.text(TemplateKey::RecipeSystem),
        user: translator.render(TemplateKey::RecipeBatchUser, &args),
        schema: schema::recipe_batch().to_json(),
        temperature: RECIPE_BATCH_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::{DinerCounts, Language};

    fn profile() -> UserProfile {
        UserProfile {
            id: "p1".to_string(),
            name: "Home".to_string(),
            diners: DinerCounts {
                toddlers: 1,
                adults_under_50: 2,
                ..DinerCounts::default()
            },
            forbidden_foods: vec![],
            prioritize_favorites: false,
        }
    }

    #[test]
    fn test_recipe_prompt() {
        let spec = render_recipe_prompt(
            &BuiltinTranslator::new(Language::En),
            "Lentil stew",
            &profile(),
            DifficultyLevel::Chef,
        );
        assert!(spec.user.contains("\"Lentil stew\""));
        assert!(spec.user.contains("Kids (2-7): 1"));
        assert!(spec.user.contains("none"));
        assert!(spec.user.contains("pro"));
        assert_eq!(spec.temperature, 0.5);
        assert_eq!(spec.context, "generating the recipe for \"Lentil stew\"");
    }

    #[test]
    fn test_batch_prompt_numbers_meals() {
        let names = vec!["Paella".to_string(), "Gazpacho".to_string()];
        let spec = render_recipe_batch_prompt(
            &BuiltinTranslator::new(Language::Es),
            &names,
            &profile(),
            DifficultyLevel::Medium,
        );
        assert!(spec.user.contains("1. Paella\n2. Gazpacho"));
        assert_eq!(spec.task, Task::RecipeBatch);
        assert_eq!(spec.schema["type"], "ARRAY");
        assert_eq!(spec.context, "generar 2 recetas");
    }
}
