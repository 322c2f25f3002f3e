//! Draft state for creating a recipe.
//!
//! A [`RecipeDraft`] holds whatever the user has typed so far. Nothing here is
//! persisted; [`RecipeDraft::submit`] validates the draft and hands back a
//! [`NewRecipe`] for the repository.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ingredient_id, Ingredient, NewRecipe};

/// Why a draft was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The name is empty or whitespace.
    #[error("recipe name is empty")]
    EmptyName,
    /// No ingredient row has a name.
    #[error("recipe has no named ingredients")]
    NoIngredients,
}

/// One editable ingredient row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftIngredient {
    /// Ingredient name.
    pub name: String,
    /// Amount, free text.
    pub amount: String,
    /// Unit, free text.
    pub unit: String,
}

/// Field of a [`DraftIngredient`] to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    /// The name.
    Name,
    /// The amount.
    Amount,
    /// The unit.
    Unit,
}

impl std::str::FromStr for IngredientField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "amount" | "amt" => Ok(Self::Amount),
            "unit" => Ok(Self::Unit),
            other => Err(format!("unknown ingredient field: {other}")),
        }
    }
}

/// Uncommitted recipe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    description: String,
    ingredients: Vec<DraftIngredient>,
    instructions: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            ingredients: vec![DraftIngredient::default()],
            instructions: vec![String::new()],
        }
    }
}

impl RecipeDraft {
    /// A blank draft with one empty ingredient row and one empty step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current name as typed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current description as typed.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ingredient rows in order.
    #[must_use]
    pub fn ingredients(&self) -> &[DraftIngredient] {
        &self.ingredients
    }

    /// Instruction rows in order.
    #[must_use]
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Replace the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Append an empty ingredient row.
    pub fn add_ingredient(&mut self) {
        self.ingredients.push(DraftIngredient::default());
    }

    /// Remove the ingredient row at `index`.
    ///
    /// The last remaining row is never removed. Returns whether a row was
    /// removed.
    pub fn remove_ingredient(&mut self, index: usize) -> bool {
        if self.ingredients.len() <= 1 || index >= self.ingredients.len() {
            return false;
        }
        self.ingredients.remove(index);
        true
    }

    /// Set one field of the ingredient row at `index`.
    ///
    /// Returns `false` if there is no such row.
    pub fn update_ingredient(
        &mut self,
        index: usize,
        field: IngredientField,
        value: impl Into<String>,
    ) -> bool {
        let Some(row) = self.ingredients.get_mut(index) else {
            return false;
        };
        let value = value.into();
        match field {
            IngredientField::Name => row.name = value,
            IngredientField::Amount => row.amount = value,
            IngredientField::Unit => row.unit = value,
        }
        true
    }

    /// Append an empty instruction row.
    pub fn add_instruction(&mut self) {
        self.instructions.push(String::new());
    }

    /// Remove the instruction row at `index`; the last row is kept.
    pub fn remove_instruction(&mut self, index: usize) -> bool {
        if self.instructions.len() <= 1 || index >= self.instructions.len() {
            return false;
        }
        self.instructions.remove(index);
        true
    }

    /// Replace the instruction row at `index`.
    pub fn update_instruction(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(row) = self.instructions.get_mut(index) else {
            return false;
        };
        *row = value.into();
        true
    }

    /// Render the form with 1-based row numbers.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Add New Recipe");
        let _ = writeln!(out, "  Name:        {}", self.name);
        let _ = writeln!(out, "  Description: {}", self.description);
        let _ = writeln!(out, "  Ingredients:");
        for (i, row) in self.ingredients.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {}. name: {:<16} amount: {:<6} unit: {}",
                i + 1,
                row.name,
                row.amount,
                row.unit
            );
        }
        let _ = writeln!(out, "  Instructions:");
        for (i, step) in self.instructions.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", i + 1, step);
        }
        out
    }

    /// Discard everything typed so far.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate the draft with ingredient ids stamped from the current time.
    ///
    /// # Errors
    ///
    /// See [`RecipeDraft::submit_at`].
    pub fn submit(&mut self) -> Result<NewRecipe, ValidationError> {
        self.submit_at(Utc::now())
    }

    /// Validate the draft and, if it is acceptable, reset it.
    ///
    /// Blank-named ingredient rows and blank steps are dropped; surviving
    /// ingredients get ids `ing-<millis>-<n>`. On rejection the draft is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyName`] when the trimmed name is empty, else
    /// [`ValidationError::NoIngredients`] when no ingredient row is named.
    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Result<NewRecipe, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let ingredients: Vec<Ingredient> = self
            .ingredients
            .iter()
            .filter(|row| !row.name.trim().is_empty())
            .enumerate()
            .map(|(index, row)| Ingredient {
                id: ingredient_id(now, index),
                name: row.name.clone(),
                amount: row.amount.clone(),
                unit: row.unit.clone(),
            })
            .collect();
        if ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }

        let recipe = NewRecipe {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            ingredients,
            instructions: self
                .instructions
                .iter()
                .filter(|step| !step.trim().is_empty())
                .cloned()
                .collect(),
        };

        self.clear();
        Ok(recipe)
    }
}
