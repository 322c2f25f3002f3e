//! Flashcard drill.
//!
//! A linear cursor over every ingredient of every recipe, in order. The
//! drill holds only its position; the recipes are passed in on each call so
//! it always reads the repository's current snapshot.

use std::fmt::Write;

use crate::model::{Ingredient, Recipe};

/// Shown when there is nothing to drill.
pub const EMPTY_MESSAGE: &str = "Add some recipes first to practice with flashcards!";

/// Cursor state of the flashcard drill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashcardDrill {
    recipe_index: usize,
    card_index: usize,
    answer_revealed: bool,
}

/// 1-based position of the current card among all cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Current card number, starting at 1.
    pub position: usize,
    /// Total number of cards.
    pub total: usize,
}

/// Everything needed to draw the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flashcard<'a> {
    /// The recipe being drilled.
    pub recipe: &'a Recipe,
    /// The ingredient on this card.
    pub ingredient: &'a Ingredient,
    /// 1-based recipe number.
    pub recipe_number: usize,
    /// Number of recipes.
    pub recipe_count: usize,
    /// 1-based ingredient number within the recipe.
    pub card_number: usize,
    /// Whether the answer side is showing.
    pub revealed: bool,
}

impl FlashcardDrill {
    /// Start at the first card with the answer hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current recipe.
    #[must_use]
    pub fn recipe_index(&self) -> usize {
        self.recipe_index
    }

    /// Index of the current ingredient within its recipe.
    #[must_use]
    pub fn card_index(&self) -> usize {
        self.card_index
    }

    /// Whether the answer is showing.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.answer_revealed
    }

    /// At the first card of the first recipe.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.recipe_index == 0 && self.card_index == 0
    }

    /// At the last card of the last recipe (or there are no recipes).
    #[must_use]
    pub fn is_last(&self, recipes: &[Recipe]) -> bool {
        match recipes.last() {
            None => true,
            Some(last) => {
                self.recipe_index + 1 >= recipes.len()
                    && self.card_index + 1 >= last.ingredient_count()
            }
        }
    }

    /// Move to the next card, crossing into the next recipe when needed.
    ///
    /// Always hides the answer. The cursor stays put on the very last card.
    /// Returns whether the cursor moved.
    pub fn advance(&mut self, recipes: &[Recipe]) -> bool {
        self.answer_revealed = false;
        let Some(current) = recipes.get(self.recipe_index) else {
            return false;
        };

        if self.card_index + 1 < current.ingredient_count() {
            self.card_index += 1;
        } else if self.recipe_index + 1 < recipes.len() {
            self.recipe_index += 1;
            self.card_index = 0;
        } else {
            return false;
        }
        true
    }

    /// Move to the previous card, landing on the last ingredient of the
    /// previous recipe when crossing back.
    ///
    /// Always hides the answer. The cursor stays put on the very first card.
    pub fn retreat(&mut self, recipes: &[Recipe]) -> bool {
        self.answer_revealed = false;
        if self.card_index > 0 {
            self.card_index -= 1;
        } else if self.recipe_index > 0 {
            self.recipe_index -= 1;
            self.card_index = recipes
                .get(self.recipe_index)
                .map_or(0, |r| r.ingredient_count().saturating_sub(1));
        } else {
            return false;
        }
        true
    }

    /// Flip between question and answer.
    pub fn toggle_reveal(&mut self) {
        self.answer_revealed = !self.answer_revealed;
    }

    /// Back to the first card, answer hidden.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Pull the cursor back inside `recipes` after the collection shrank.
    pub fn clamp(&mut self, recipes: &[Recipe]) {
        let Some(last_index) = recipes.len().checked_sub(1) else {
            self.restart();
            return;
        };

        if self.recipe_index > last_index {
            self.recipe_index = last_index;
            self.card_index = usize::MAX;
            self.answer_revealed = false;
        }
        let last_card = recipes[self.recipe_index]
            .ingredient_count()
            .saturating_sub(1);
        if self.card_index > last_card {
            self.card_index = last_card;
            self.answer_revealed = false;
        }
    }

    /// The card under the cursor, if any.
    #[must_use]
    pub fn current<'a>(&self, recipes: &'a [Recipe]) -> Option<Flashcard<'a>> {
        let recipe = recipes.get(self.recipe_index)?;
        let ingredient = recipe.ingredients.get(self.card_index)?;
        Some(Flashcard {
            recipe,
            ingredient,
            recipe_number: self.recipe_index + 1,
            recipe_count: recipes.len(),
            card_number: self.card_index + 1,
            revealed: self.answer_revealed,
        })
    }

    /// Global position of the current card.
    ///
    /// Counts every ingredient of the preceding recipes, so the number is
    /// exact even when recipes have different ingredient counts.
    #[must_use]
    pub fn progress(&self, recipes: &[Recipe]) -> Progress {
        let before: usize = recipes
            .iter()
            .take(self.recipe_index)
            .map(Recipe::ingredient_count)
            .sum();
        Progress {
            position: before + self.card_index + 1,
            total: recipes.iter().map(Recipe::ingredient_count).sum(),
        }
    }

    /// Render the current card with its navigation footer.
    #[must_use]
    pub fn render(&self, recipes: &[Recipe]) -> String {
        let Some(card) = self.current(recipes) else {
            return format!("{EMPTY_MESSAGE}\n");
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Recipe: {} ({}/{})",
            card.recipe.name, card.recipe_number, card.recipe_count
        );
        let _ = writeln!(
            out,
            "Ingredient {} of {}",
            card.card_number,
            card.recipe.ingredient_count()
        );
        out.push('\n');

        if card.revealed {
            let _ = writeln!(out, "  ANSWER");
            let _ = writeln!(out, "  {}", card.ingredient.name);
            let measure = card.ingredient.measure();
            if !measure.is_empty() {
                let _ = writeln!(out, "  {measure}");
            }
        } else {
            let _ = writeln!(out, "  QUESTION");
            let _ = writeln!(out, "  What is ingredient #{}?", card.card_number);
            let _ = writeln!(out, "  (flip to reveal)");
        }
        out.push('\n');

        let progress = self.progress(recipes);
        let prev = if self.is_first() { "-" } else { "prev" };
        let next = if self.is_last(recipes) { "-" } else { "next" };
        let _ = writeln!(
            out,
            "[{prev}]  Card {} of {}  [{next}]",
            progress.position, progress.total
        );
        out
    }
}
