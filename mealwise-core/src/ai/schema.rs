//! Response schemas for structured generation.
//!
//! Schemas are built as a small tree and serialized into the uppercase
//! `responseSchema` dialect Gemini accepts.

use serde_json::{json, Map, Value};

use crate::shopping::ShoppingCategory;
use crate::types::{MealSlot, Weekday};

/// A node in a response schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object {
        properties: Vec<(&'static str, Schema)>,
        required: Vec<&'static str>,
        description: Option<&'static str>,
    },
    Array {
        items: Box<Schema>,
        description: Option<&'static str>,
    },
    String {
        choices: Vec<String>,
        description: Option<&'static str>,
    },
    Integer {
        description: Option<&'static str>,
    },
}

impl Schema {
    /// An object whose properties are all required.
    pub fn object(properties: Vec<(&'static str, Schema)>) -> Self {
        let required = properties.iter().map(|(name, _)| *name).collect();
        Schema::Object {
            properties,
            required,
            description: None,
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            description: None,
        }
    }

    pub fn string() -> Self {
        Schema::String {
            choices: Vec::new(),
            description: None,
        }
    }

    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::String {
            choices: choices.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn integer() -> Self {
        Schema::Integer { description: None }
    }

    pub fn describe(mut self, text: &'static str) -> Self {
        match &mut self {
            Schema::Object { description, .. }
            | Schema::Array { description, .. }
            | Schema::String { description, .. }
            | Schema::Integer { description } => *description = Some(text),
        }
        self
    }

    /// Serialize into Gemini's `responseSchema` JSON.
    pub fn to_json(&self) -> Value {
        let mut node = Map::new();
        let description = match self {
            Schema::Object {
                properties,
                required,
                description,
            } => {
                node.insert("type".into(), json!("OBJECT"));
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.to_json()))
                    .collect();
                node.insert("properties".into(), Value::Object(props));
                node.insert("required".into(), json!(required));
                description
            }
            Schema::Array { items, description } => {
                node.insert("type".into(), json!("ARRAY"));
                node.insert("items".into(), items.to_json());
                description
            }
            Schema::String {
                choices,
                description,
            } => {
                node.insert("type".into(), json!("STRING"));
                if !choices.is_empty() {
                    node.insert("enum".into(), json!(choices));
                }
                description
            }
            Schema::Integer { description } => {
                node.insert("type".into(), json!("INTEGER"));
                description
            }
        };
        if let Some(text) = description {
            node.insert("description".into(), json!(text));
        }
        Value::Object(node)
    }
}

/// A single detailed recipe. No id is requested; ids are assigned locally.
pub fn recipe() -> Schema {
    Schema::object(vec![
        ("name", Schema::string().describe("The name of the dish.")),
        ("instructions", Schema::array(Schema::string())),
        (
            "ingredients",
            Schema::array(Schema::object(vec![
                ("name", Schema::string()),
                ("quantity", Schema::string()),
            ])),
        ),
        ("complexity", Schema::one_of(["Easy", "Medium", "Chef"])),
        ("prepTime", Schema::string().describe("e.g. '30 min'")),
        (
            "category",
            Schema::one_of(["Protein", "Carbs", "Vegetable", "Mixed"]),
        ),
    ])
}

/// Recipes for several dishes, each tagged with the requested name.
pub fn recipe_batch() -> Schema {
    Schema::array(Schema::object(vec![
        (
            "mealName",
            Schema::string().describe("The original name of the requested dish."),
        ),
        ("recipe", recipe()),
    ]))
    .describe("One entry per requested dish with its generated recipe.")
}

/// Names only, for all seven days and five slots.
pub fn weekly_skeleton() -> Schema {
    let meal = Schema::object(vec![(
        "name",
        Schema::string().describe("Name of the meal, e.g. 'Grilled salmon'"),
    )]);
    let day = Schema::object(
        MealSlot::ALL
            .into_iter()
            .map(|slot| (slot.as_str(), meal.clone()))
            .collect(),
    );
    Schema::object(
        Weekday::ALL
            .into_iter()
            .map(|weekday| (weekday.as_str(), day.clone()))
            .collect(),
    )
}

pub fn shopping_list() -> Schema {
    let labels = ShoppingCategory::ALL
        .into_iter()
        .flat_map(|category| [category.spanish_label(), category.english_label()]);
    Schema::array(Schema::object(vec![
        ("name", Schema::string().describe("Consolidated ingredient name.")),
        ("quantity", Schema::string().describe("Total quantity needed.")),
        (
            "category",
            Schema::one_of(labels).describe("Supermarket category."),
        ),
    ]))
}

pub fn quick_ideas() -> Schema {
    Schema::array(Schema::object(vec![
        ("name", Schema::string().describe("Name of the recipe idea.")),
        (
            "description",
            Schema::string().describe("A short, enticing description of the recipe."),
        ),
    ]))
}

pub fn swap_suggestions() -> Schema {
    Schema::object(vec![(
        "suggestions",
        Schema::array(Schema::string()).describe("Three alternative meal names."),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_schema_json() {
        let value = recipe().to_json();
        assert_eq!(value["type"], "OBJECT");
        assert_eq!(value["properties"]["complexity"]["enum"][2], "Chef");
        assert_eq!(value["properties"]["ingredients"]["items"]["type"], "OBJECT");
        let required = value["required"].as_array().unwrap();
        assert!(!required.contains(&json!("id")));
        assert!(required.contains(&json!("prepTime")));
    }

    #[test]
    fn test_skeleton_covers_week() {
        let value = weekly_skeleton().to_json();
        assert_eq!(value["required"].as_array().unwrap().len(), 7);
        assert_eq!(
            value["properties"]["sunday"]["properties"]["morning_snack"]["type"],
            "OBJECT"
        );
    }

    #[test]
    fn test_shopping_categories_are_bilingual() {
        let value = shopping_list().to_json();
        let labels = value["items"]["properties"]["category"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(labels.len(), 18);
        assert!(labels.contains(&json!("Pescadería")));
        assert!(labels.contains(&json!("Dairy & Eggs")));
    }

    #[test]
    fn test_description_is_emitted() {
        let value = swap_suggestions().to_json();
        assert_eq!(
            value["properties"]["suggestions"]["description"],
            "Three alternative meal names."
        );
        assert!(value.get("description").is_none());
    }
}
