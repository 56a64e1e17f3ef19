//! Shopping list consolidation prompt.

use super::{PromptSpec, SHOPPING_LIST_TEMPERATURE};
use crate::ai::schema;
use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::llm::Task;
use crate::types::Ingredient;

/// Render the consolidation prompt. Ingredients with blank names are skipped.
pub fn render_shopping_list_prompt(
    translator: &dyn Translator,
    ingredients: &[Ingredient],
) -> PromptSpec {
    let lines = ingredients
        .iter()
        .filter(|i| !i.name.trim().is_empty())
        .map(|i| format!("- {}: {}", i.name.trim(), i.quantity.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    PromptSpec {
        task: Task::ShoppingList,
        context: translator.text(TemplateKey::ShoppingListContext),
        system: translator.text(TemplateKey::ShoppingListSystem),
        user: translator.render(
            TemplateKey::ShoppingListUser,
            &TemplateArgs::new().with("ingredients", lines),
        ),
        schema: schema::shopping_list().to_json(),
        temperature: SHOPPING_LIST_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::Language;

    #[test]
    fn test_ingredient_lines() {
        let ingredients = vec![
            Ingredient {
                name: "Rice".to_string(),
                quantity: "200 g".to_string(),
            },
            Ingredient {
                name: "  ".to_string(),
                quantity: "1".to_string(),
            },
            Ingredient {
                name: "Salt".to_string(),
                quantity: "".to_string(),
            },
        ];
        let spec = render_shopping_list_prompt(&BuiltinTranslator::new(Language::En), &ingredients);
        assert!(spec.user.ends_with("- Rice: 200 g\n- Salt: "));
        assert_eq!(spec.temperature, 0.2);
    }
}
