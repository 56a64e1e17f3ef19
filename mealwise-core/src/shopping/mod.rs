//! Shopping list consolidation.
//!
//! A list is built from a plan in three steps: resolve every missing
//! recipe, send the flattened ingredients for consolidation in one call,
//! then group the returned items by category in aisle order.

mod category;

pub use category::{compare_labels, ShoppingCategory};

use crate::error::PlannerError;
use crate::i18n::TemplateKey;
use crate::planner::PlanAssembler;
use crate::types::{
    DifficultyLevel, Ingredient, ShoppingGroup, ShoppingList, ShoppingListItem, UserProfile,
    WeeklyPlan,
};

/// A built list together with the plan whose recipes it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingOutcome {
    pub plan: WeeklyPlan,
    pub list: ShoppingList,
}

#[derive(Debug, Clone)]
pub struct ShoppingListAggregator {
    assembler: PlanAssembler,
}

impl ShoppingListAggregator {
    pub fn new(assembler: PlanAssembler) -> Self {
        Self { assembler }
    }

    pub async fn build(
        &self,
        plan: &WeeklyPlan,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<ShoppingOutcome, PlannerError> {
        let plan = self.assembler.resolve_recipes(plan, profile, level).await?;

        let ingredients = collect_ingredients(&plan);
        if ingredients.is_empty() {
            tracing::debug!("No ingredients to consolidate");
            return Ok(ShoppingOutcome {
                plan,
                list: ShoppingList::default(),
            });
        }

        let gateway = self.assembler.gateway();
        let items = gateway.shopping_list(&ingredients).await?;
        let fallback = gateway.translator().text(TemplateKey::CategoryOther);
        let list = group_items(items, &fallback);

        tracing::debug!(
            ingredients = ingredients.len(),
            groups = list.groups.len(),
            "Built shopping list"
        );
        Ok(ShoppingOutcome { plan, list })
    }
}

/// Every non-blank ingredient of every detailed meal, in plan order.
pub fn collect_ingredients(plan: &WeeklyPlan) -> Vec<Ingredient> {
    plan.meals()
        .filter_map(|(_, _, meal)| meal.recipe())
        .flat_map(|recipe| recipe.ingredients.iter())
        .filter(|ingredient| !ingredient.name.trim().is_empty())
        .cloned()
        .collect()
}

/// Group items by label and order the groups. Blank labels fall back to
/// `fallback_label`; unknown labels are kept verbatim.
pub fn group_items(items: Vec<ShoppingListItem>, fallback_label: &str) -> ShoppingList {
    let mut groups: Vec<ShoppingGroup> = Vec::new();

    for mut item in items {
        if item.name.trim().is_empty() {
            continue;
        }
        let label = match item.category.trim() {
            "" => fallback_label.to_string(),
            label => label.to_string(),
        };
        item.category = label.clone();

        match groups.iter_mut().find(|group| group.category == label) {
            Some(group) => group.items.push(item),
            None => groups.push(ShoppingGroup {
                category: label,
                items: vec![item],
            }),
        }
    }

    groups.sort_by(|a, b| compare_labels(&a.category, &b.category));
    ShoppingList { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            quantity: "1".to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_group_items_orders_categories() {
        let list = group_items(
            vec![
                item("Milk", "Lácteos y Huevos"),
                item("Wine", "Vinos"),
                item("Chicken", "Carnicería"),
                item("Rice", ""),
                item("Eggs", "Lácteos y Huevos"),
                item("  ", "Despensa"),
                item("Apples", "Frutas y Verduras"),
            ],
            "Otros",
        );

        assert_eq!(
            list.categories(),
            vec!["Frutas y Verduras", "Carnicería", "Lácteos y Huevos", "Otros", "Vinos"]
        );
        let dairy: Vec<&str> = list.groups[2].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(dairy, vec!["Milk", "Eggs"]);
        assert_eq!(list.groups[3].items[0].category, "Otros");
        assert_eq!(list.items().count(), 6);
    }
}
