//! Text rendering of stored recipes.

use std::fmt::Write;

use serde::Serialize;

use crate::model::Recipe;

/// Shown when there is nothing to list.
pub const EMPTY_LIST_MESSAGE: &str = "No recipes yet. Add your first recipe to get started!";

/// Render every recipe, numbered from 1, in full.
#[must_use]
pub fn render_list(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }

    let mut out = String::new();
    for (index, recipe) in recipes.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = write!(out, "#{} ", index + 1);
        out.push_str(&render_recipe(recipe));
    }
    out
}

/// Render one recipe: name, description, ingredients and numbered steps.
#[must_use]
pub fn render_recipe(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", recipe.name, recipe.id);
    if !recipe.description.is_empty() {
        let _ = writeln!(out, "  {}", recipe.description);
    }

    let _ = writeln!(out, "  Ingredients:");
    for ingredient in &recipe.ingredients {
        let measure = ingredient.measure();
        if measure.is_empty() {
            let _ = writeln!(out, "    - {}", ingredient.name);
        } else {
            let _ = writeln!(out, "    - {} {}", measure, ingredient.name);
        }
    }

    if !recipe.instructions.is_empty() {
        let _ = writeln!(out, "  Instructions:");
        for (step, instruction) in recipe.instructions.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", step + 1, instruction);
        }
    }
    out
}

/// One-line-per-recipe listing used by `list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary<'a> {
    /// Recipe id.
    pub id: &'a str,
    /// Recipe name.
    pub name: &'a str,
    /// Number of ingredients.
    pub ingredients: usize,
    /// Number of steps.
    pub instructions: usize,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl<'a> From<&'a Recipe> for RecipeSummary<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            id: &recipe.id,
            name: &recipe.name,
            ingredients: recipe.ingredient_count(),
            instructions: recipe.instructions.len(),
            created_at: recipe.created_at.to_rfc3339(),
        }
    }
}
