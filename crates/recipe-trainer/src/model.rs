//! Recipe and ingredient value types.
//!
//! The serialized shape uses camelCase keys and millisecond timestamps so the
//! stored document stays compatible with collections written by earlier
//! versions of the trainer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ingredient line. Amount and unit are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Identifier, unique within the owning recipe.
    pub id: String,
    /// What the ingredient is.
    pub name: String,
    /// How much of it, as entered.
    #[serde(default)]
    pub amount: String,
    /// Unit of the amount, as entered.
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    /// The amount and unit joined for display, e.g. `"2 cup"`.
    #[must_use]
    pub fn measure(&self) -> String {
        join_measure(&self.amount, &self.unit)
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Globally unique identifier.
    pub id: String,
    /// Display name, never empty.
    pub name: String,
    /// Optional free-text description; empty when not given.
    #[serde(default)]
    pub description: String,
    /// Ingredients in display and drill order.
    pub ingredients: Vec<Ingredient>,
    /// Preparation steps in order.
    #[serde(default)]
    pub instructions: Vec<String>,
    /// When the recipe was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Number of ingredients, i.e. flashcards or card pairs this recipe yields.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }
}

/// A validated recipe that has not been assigned an id or timestamp yet.
///
/// Produced by [`crate::editor::RecipeDraft::submit`] and turned into a
/// [`Recipe`] by [`crate::repository::RecipeRepository::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Trimmed, non-empty name.
    pub name: String,
    /// Trimmed description.
    pub description: String,
    /// At least one ingredient, each with an id.
    pub ingredients: Vec<Ingredient>,
    /// Non-blank steps.
    pub instructions: Vec<String>,
}

impl NewRecipe {
    /// Finish the recipe with its id and creation time.
    #[must_use]
    pub fn into_recipe(self, id: String, created_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            name: self.name,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            created_at,
        }
    }
}

/// Time-based recipe id, `recipe-<millis>`.
#[must_use]
pub fn recipe_id(now: DateTime<Utc>) -> String {
    format!("recipe-{}", now.timestamp_millis())
}

/// Time-based ingredient id, `ing-<millis>-<index>`.
#[must_use]
pub fn ingredient_id(now: DateTime<Utc>, index: usize) -> String {
    format!("ing-{}-{index}", now.timestamp_millis())
}

pub(crate) fn join_measure(amount: &str, unit: &str) -> String {
    format!("{amount} {unit}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    fn sample_recipe() -> Recipe {
        Recipe {
            id: "recipe-1".to_string(),
            name: "Pancakes".to_string(),
            description: "Sunday breakfast".to_string(),
            ingredients: vec![Ingredient {
                id: "ing-1-0".to_string(),
                name: "Flour".to_string(),
                amount: "2".to_string(),
                unit: "cup".to_string(),
            }],
            instructions: vec!["Mix".to_string()],
            created_at: sample_time(),
        }
    }

    #[test]
    fn test_ids_are_time_based() {
        assert_eq!(recipe_id(sample_time()), "recipe-1700000000123");
        assert_eq!(ingredient_id(sample_time(), 3), "ing-1700000000123-3");
    }

    #[test]
    fn test_measure_joins_amount_and_unit() {
        let mut ing = sample_recipe().ingredients.remove(0);
        assert_eq!(ing.measure(), "2 cup");

        ing.unit.clear();
        assert_eq!(ing.measure(), "2");

        ing.amount.clear();
        assert_eq!(ing.measure(), "");
    }

    #[test]
    fn test_serialized_shape_uses_camel_case_and_millis() {
        let json = serde_json::to_value(sample_recipe()).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_123_i64);
        assert_eq!(json["ingredients"][0]["unit"], "cup");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let json = r#"{
            "id": "recipe-9",
            "name": "Toast",
            "ingredients": [{"id": "ing-9-0", "name": "Bread"}],
            "createdAt": 0
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.description, "");
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.ingredients[0].amount, "");
        assert_eq!(recipe.ingredients[0].unit, "");
    }

    #[test]
    fn test_missing_identity_fields_are_rejected() {
        let json = r#"{"id": "recipe-9", "ingredients": [], "createdAt": 0}"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }

    #[test]
    fn test_new_recipe_into_recipe() {
        let recipe = sample_recipe();
        let new = NewRecipe {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        };
        assert_eq!(new.into_recipe("recipe-1".to_string(), sample_time()), recipe);
    }
}
