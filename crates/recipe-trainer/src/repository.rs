//! In-memory recipe repository.
//!
//! The repository is the single source of truth for the running session. It
//! is loaded once at startup and writes the full collection back through its
//! [`RecipePersistence`] after every mutation.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{recipe_id, NewRecipe, Recipe};
use crate::persistence::RecipePersistence;

/// Ordered recipe collection with persist-on-change semantics.
#[derive(Debug)]
pub struct RecipeRepository {
    persistence: Box<dyn RecipePersistence>,
    recipes: Vec<Recipe>,
    revision: u64,
}

impl RecipeRepository {
    /// Load the stored collection. Never fails; see [`RecipePersistence::load`].
    #[must_use]
    pub fn load(persistence: Box<dyn RecipePersistence>) -> Self {
        let recipes = persistence.load();
        info!("Loaded {} recipes", recipes.len());
        Self {
            persistence,
            recipes,
            revision: 0,
        }
    }

    /// All recipes in insertion order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether there are no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Sum of ingredient counts across all recipes.
    #[must_use]
    pub fn total_ingredients(&self) -> usize {
        self.recipes.iter().map(Recipe::ingredient_count).sum()
    }

    /// Incremented on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a recipe by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Resolve a user reference: a recipe id, or a 1-based position written
    /// as `#n` or `n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeNotFound`] if nothing matches.
    pub fn find(&self, reference: &str) -> Result<&Recipe> {
        let reference = reference.trim();
        if let Some(recipe) = self.get(reference) {
            return Ok(recipe);
        }

        reference
            .trim_start_matches('#')
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.recipes.get(index))
            .ok_or_else(|| Error::recipe_not_found(reference))
    }

    /// Append a new recipe created now and persist.
    pub fn append(&mut self, new: NewRecipe) -> &Recipe {
        self.append_at(new, Utc::now())
    }

    /// Append a new recipe created at `now` and persist.
    ///
    /// The id is time-based; when another recipe already holds it, `-2`,
    /// `-3`, ... is appended until it is unique.
    pub fn append_at(&mut self, new: NewRecipe, now: DateTime<Utc>) -> &Recipe {
        let base = recipe_id(now);
        let mut id = base.clone();
        let mut suffix = 2;
        while self.get(&id).is_some() {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }

        let recipe = new.into_recipe(id, now);
        info!("Adding recipe '{}' ({})", recipe.name, recipe.id);
        self.recipes.push(recipe);
        self.changed();

        &self.recipes[self.recipes.len() - 1]
    }

    /// Delete the recipe with `id` and persist.
    ///
    /// Returns `false` (and writes nothing) if no such recipe exists.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        if self.recipes.len() == before {
            debug!("Delete of unknown recipe {id} ignored");
            return false;
        }

        info!("Deleted recipe {id}");
        self.changed();
        true
    }

    fn changed(&mut self) {
        self.revision += 1;
        self.persistence.save(&self.recipes);
    }
}
