//! Application controller.
//!
//! [`App`] owns the repository, the active view and the per-view state, and
//! is the only place where user actions turn into state changes. After any
//! repository mutation it brings both drills back in line with the new
//! collection.

use std::fmt::{self, Write};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::browser;
use crate::editor::{IngredientField, RecipeDraft};
use crate::error::{Error, Result};
use crate::flashcards::FlashcardDrill;
use crate::matching::{MatchingDrill, PendingResolution, SelectOutcome};
use crate::repository::RecipeRepository;

/// The four views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Stored recipes.
    #[default]
    Recipes,
    /// The new-recipe form.
    Add,
    /// Flashcard drill.
    Flashcards,
    /// Matching drill.
    Game,
}

impl View {
    /// All views in tab order.
    pub const ALL: [View; 4] = [View::Recipes, View::Add, View::Flashcards, View::Game];
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipes => write!(f, "Recipes"),
            Self::Add => write!(f, "Add"),
            Self::Flashcards => write!(f, "Flashcards"),
            Self::Game => write!(f, "Game"),
        }
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recipes" | "list" => Ok(Self::Recipes),
            "add" | "new" => Ok(Self::Add),
            "flashcards" | "cards" => Ok(Self::Flashcards),
            "game" | "match" | "matching" => Ok(Self::Game),
            other => Err(Error::invalid_input(format!("unknown view: {other}"))),
        }
    }
}

/// An edit to the recipe draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    /// Replace the name.
    SetName(String),
    /// Replace the description.
    SetDescription(String),
    /// Append an ingredient row.
    AddIngredient,
    /// Remove an ingredient row (0-based).
    RemoveIngredient(usize),
    /// Set one field of an ingredient row (0-based).
    UpdateIngredient(usize, IngredientField, String),
    /// Append an instruction row.
    AddInstruction,
    /// Remove an instruction row (0-based).
    RemoveInstruction(usize),
    /// Replace an instruction row (0-based).
    UpdateInstruction(usize, String),
    /// Start over.
    Clear,
}

/// A flashcard navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardMove {
    /// Next card.
    Next,
    /// Previous card.
    Previous,
    /// Show or hide the answer.
    Flip,
    /// Back to the first card.
    Restart,
}

/// Everything a user (or a timer) can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Switch the active view.
    ShowView(View),
    /// Delete a recipe by id or position.
    DeleteRecipe(String),
    /// Edit the draft.
    Draft(DraftEdit),
    /// Validate the draft and store it.
    SubmitDraft,
    /// Move through the flashcards.
    Flashcard(FlashcardMove),
    /// Turn up a matching card (0-based table position).
    SelectCard(usize),
    /// Re-deal the current matching recipe.
    ResetGame,
    /// Deal another recipe by id or position.
    SwitchRecipe(String),
    /// A matching verdict whose pause has elapsed.
    Resolve(PendingResolution),
}

/// Follow-up work for the caller after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Deliver this resolution back after its pause.
    Schedule(PendingResolution),
    /// The matching table was re-dealt; drop any waiting resolution.
    CancelPending,
}

/// Top-level state of a session.
#[derive(Debug)]
pub struct App {
    repository: RecipeRepository,
    view: View,
    draft: RecipeDraft,
    flashcards: FlashcardDrill,
    matching: MatchingDrill,
    rng: StdRng,
}

impl App {
    /// Build the controller around a loaded repository.
    ///
    /// With a `shuffle_seed` the matching card order is reproducible.
    #[must_use]
    pub fn new(repository: RecipeRepository, shuffle_seed: Option<u64>) -> Self {
        let rng = shuffle_seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut app = Self {
            repository,
            view: View::default(),
            draft: RecipeDraft::new(),
            flashcards: FlashcardDrill::new(),
            matching: MatchingDrill::new(),
            rng,
        };
        app.sync_drills();
        app
    }

    /// The active view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// The repository.
    #[must_use]
    pub fn repository(&self) -> &RecipeRepository {
        &self.repository
    }

    /// The recipe draft.
    #[must_use]
    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    /// Flashcard state.
    #[must_use]
    pub fn flashcards(&self) -> &FlashcardDrill {
        &self.flashcards
    }

    /// Matching state.
    #[must_use]
    pub fn matching(&self) -> &MatchingDrill {
        &self.matching
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeNotFound`] when an action names a recipe that
    /// does not exist. A rejected draft is not an error: the form simply
    /// stays as it was.
    pub fn handle(&mut self, action: Action) -> Result<Effect> {
        match action {
            Action::ShowView(view) => {
                self.view = view;
                Ok(Effect::None)
            }
            Action::DeleteRecipe(reference) => {
                let id = self.repository.find(&reference)?.id.clone();
                self.repository.delete(&id);
                Ok(self.sync_drills())
            }
            Action::Draft(edit) => {
                self.edit_draft(edit);
                Ok(Effect::None)
            }
            Action::SubmitDraft => match self.draft.submit() {
                Ok(recipe) => {
                    self.repository.append(recipe);
                    Ok(self.sync_drills())
                }
                Err(reason) => {
                    debug!("Draft not saved: {reason}");
                    Ok(Effect::None)
                }
            },
            Action::Flashcard(step) => {
                let recipes = self.repository.recipes();
                match step {
                    FlashcardMove::Next => {
                        self.flashcards.advance(recipes);
                    }
                    FlashcardMove::Previous => {
                        self.flashcards.retreat(recipes);
                    }
                    FlashcardMove::Flip => self.flashcards.toggle_reveal(),
                    FlashcardMove::Restart => self.flashcards.restart(),
                }
                Ok(Effect::None)
            }
            Action::SelectCard(index) => Ok(match self.matching.select(index) {
                SelectOutcome::Pending(pending) => Effect::Schedule(pending),
                SelectOutcome::Selected | SelectOutcome::Ignored => Effect::None,
            }),
            Action::ResetGame => {
                let Some(id) = self.matching.recipe_id().map(str::to_string) else {
                    return Ok(Effect::None);
                };
                self.deal(&id)?;
                Ok(Effect::CancelPending)
            }
            Action::SwitchRecipe(reference) => {
                let id = self.repository.find(&reference)?.id.clone();
                self.deal(&id)?;
                Ok(Effect::CancelPending)
            }
            Action::Resolve(pending) => {
                self.matching.resolve(pending);
                Ok(Effect::None)
            }
        }
    }

    fn edit_draft(&mut self, edit: DraftEdit) {
        let draft = &mut self.draft;
        let applied = match edit {
            DraftEdit::SetName(name) => {
                draft.set_name(name);
                true
            }
            DraftEdit::SetDescription(description) => {
                draft.set_description(description);
                true
            }
            DraftEdit::AddIngredient => {
                draft.add_ingredient();
                true
            }
            DraftEdit::RemoveIngredient(index) => draft.remove_ingredient(index),
            DraftEdit::UpdateIngredient(index, field, value) => {
                draft.update_ingredient(index, field, value)
            }
            DraftEdit::AddInstruction => {
                draft.add_instruction();
                true
            }
            DraftEdit::RemoveInstruction(index) => draft.remove_instruction(index),
            DraftEdit::UpdateInstruction(index, value) => draft.update_instruction(index, value),
            DraftEdit::Clear => {
                draft.clear();
                true
            }
        };
        if !applied {
            debug!("Draft edit had no effect");
        }
    }

    fn deal(&mut self, id: &str) -> Result<()> {
        let recipe = self
            .repository
            .get(id)
            .ok_or_else(|| Error::recipe_not_found(id))?;
        self.matching.initialize(recipe, &mut self.rng);
        info!("Matching game dealt for '{}'", recipe.name);
        Ok(())
    }

    /// Keep the drills pointing at recipes that still exist.
    fn sync_drills(&mut self) -> Effect {
        let recipes = self.repository.recipes();
        self.flashcards.clamp(recipes);

        let still_there = self
            .matching
            .recipe_id()
            .is_some_and(|id| recipes.iter().any(|r| r.id == id));
        if still_there {
            return Effect::None;
        }

        match recipes.first() {
            Some(first) => self.matching.initialize(first, &mut self.rng),
            None if self.matching.recipe_id().is_some() => self.matching.clear(),
            None => return Effect::None,
        }
        Effect::CancelPending
    }

    /// Render the view selector followed by the active view.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for view in View::ALL {
            if view == self.view {
                let _ = write!(out, "[{view}] ");
            } else {
                let _ = write!(out, " {view}  ");
            }
        }
        out.push_str("\n\n");

        let recipes = self.repository.recipes();
        out.push_str(&match self.view {
            View::Recipes => browser::render_list(recipes),
            View::Add => self.draft.render(),
            View::Flashcards => self.flashcards.render(recipes),
            View::Game => self.matching.render(recipes),
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::CardKind;
    use crate::repository::tests::{new_recipe, MemoryPersistence};
    use chrono::{TimeZone, Utc};

    fn app_with(recipes: &[(&str, &[&str])]) -> App {
        let initial = recipes
            .iter()
            .enumerate()
            .map(|(i, (name, ingredients))| {
                new_recipe(name, ingredients).into_recipe(
                    format!("recipe-{i}"),
                    Utc.timestamp_millis_opt(i64::try_from(i).unwrap()).unwrap(),
                )
            })
            .collect();
        let repository = RecipeRepository::load(Box::new(MemoryPersistence {
            initial,
            ..Default::default()
        }));
        App::new(repository, Some(42))
    }

    fn fill_draft(app: &mut App, name: &str, ingredient: &str) {
        app.handle(Action::Draft(DraftEdit::SetName(name.to_string())))
            .unwrap();
        app.handle(Action::Draft(DraftEdit::UpdateIngredient(
            0,
            IngredientField::Name,
            ingredient.to_string(),
        )))
        .unwrap();
    }

    fn card(app: &App, kind: CardKind, match_id: &str) -> usize {
        app.matching()
            .cards()
            .iter()
            .position(|c| c.kind == kind && c.match_id == match_id)
            .unwrap()
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("game".parse::<View>().unwrap(), View::Game);
        assert_eq!("Cards".parse::<View>().unwrap(), View::Flashcards);
        assert!("settings".parse::<View>().is_err());
    }

    #[test]
    fn test_empty_app_shows_prompts() {
        let mut app = app_with(&[]);
        assert!(app.matching().recipe_id().is_none());

        app.handle(Action::ShowView(View::Flashcards)).unwrap();
        assert!(app.render().contains("Add some recipes first to practice"));

        app.handle(Action::ShowView(View::Game)).unwrap();
        assert!(app.render().contains("Add some recipes first to play"));
    }

    #[test]
    fn test_matching_defaults_to_first_recipe() {
        let app = app_with(&[("Soup", &["Water"]), ("Salad", &["Lettuce"])]);
        assert_eq!(app.matching().recipe_id(), Some("recipe-0"));
        assert_eq!(app.matching().cards().len(), 2);
    }

    #[test]
    fn test_first_submitted_recipe_is_dealt() {
        let mut app = app_with(&[]);
        fill_draft(&mut app, "Toast", "Bread");

        let effect = app.handle(Action::SubmitDraft).unwrap();
        assert_eq!(effect, Effect::CancelPending);
        assert_eq!(app.repository().len(), 1);
        assert_eq!(app.matching().cards().len(), 2);
        assert_eq!(app.draft(), &RecipeDraft::new());
    }

    #[test]
    fn test_rejected_submit_keeps_draft_silently() {
        let mut app = app_with(&[]);
        fill_draft(&mut app, "   ", "Bread");
        let before = app.draft().clone();

        assert_eq!(app.handle(Action::SubmitDraft).unwrap(), Effect::None);
        assert!(app.repository().is_empty());
        assert_eq!(app.draft(), &before);
    }

    #[test]
    fn test_delete_clamps_flashcards_and_redeals_game() {
        let mut app = app_with(&[("Soup", &["Water", "Salt"]), ("Salad", &["Lettuce", "Oil"])]);
        for _ in 0..3 {
            app.handle(Action::Flashcard(FlashcardMove::Next)).unwrap();
        }
        app.handle(Action::SwitchRecipe("#2".to_string())).unwrap();
        assert_eq!(app.matching().recipe_id(), Some("recipe-1"));

        let effect = app.handle(Action::DeleteRecipe("recipe-1".to_string())).unwrap();
        assert_eq!(effect, Effect::CancelPending);
        assert_eq!(app.flashcards().recipe_index(), 0);
        assert_eq!(app.flashcards().card_index(), 1);
        assert_eq!(app.matching().recipe_id(), Some("recipe-0"));

        app.handle(Action::DeleteRecipe("1".to_string())).unwrap();
        assert!(app.matching().recipe_id().is_none());
        assert!(app.repository().is_empty());
    }

    #[test]
    fn test_delete_other_recipe_keeps_game() {
        let mut app = app_with(&[("Soup", &["Water"]), ("Salad", &["Lettuce"])]);
        let generation = app.matching().generation();

        let effect = app.handle(Action::DeleteRecipe("#2".to_string())).unwrap();
        assert_eq!(effect, Effect::None);
        assert_eq!(app.matching().generation(), generation);
    }

    #[test]
    fn test_delete_unknown_recipe_errors() {
        let mut app = app_with(&[("Soup", &["Water"])]);
        let err = app.handle(Action::DeleteRecipe("#5".to_string())).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(app.repository().len(), 1);
    }

    #[test]
    fn test_select_pair_schedules_then_resolves() {
        let mut app = app_with(&[("Soup", &["Water", "Salt"])]);
        let name = card(&app, CardKind::Ingredient, "ing-Soup-1");
        let amount = card(&app, CardKind::Amount, "ing-Soup-1");

        assert_eq!(app.handle(Action::SelectCard(name)).unwrap(), Effect::None);
        let Effect::Schedule(pending) = app.handle(Action::SelectCard(amount)).unwrap() else {
            panic!("expected a scheduled resolution");
        };

        app.handle(Action::Resolve(pending)).unwrap();
        assert_eq!(app.matching().match_count(), 1);
    }

    #[test]
    fn test_reset_discards_in_flight_resolution() {
        let mut app = app_with(&[("Soup", &["Water", "Salt"])]);
        let name = card(&app, CardKind::Ingredient, "ing-Soup-0");
        let amount = card(&app, CardKind::Amount, "ing-Soup-0");
        app.handle(Action::SelectCard(name)).unwrap();
        let Effect::Schedule(pending) = app.handle(Action::SelectCard(amount)).unwrap() else {
            panic!("expected a scheduled resolution");
        };

        assert_eq!(app.handle(Action::ResetGame).unwrap(), Effect::CancelPending);
        app.handle(Action::Resolve(pending)).unwrap();

        assert_eq!(app.matching().match_count(), 0);
        assert_eq!(app.matching().attempt_count(), 0);
    }

    #[test]
    fn test_reset_without_recipes_is_noop() {
        let mut app = app_with(&[]);
        assert_eq!(app.handle(Action::ResetGame).unwrap(), Effect::None);
    }

    #[test]
    fn test_flashcard_moves() {
        let mut app = app_with(&[("Soup", &["Water", "Salt"])]);
        app.handle(Action::Flashcard(FlashcardMove::Flip)).unwrap();
        assert!(app.flashcards().is_revealed());

        app.handle(Action::Flashcard(FlashcardMove::Next)).unwrap();
        assert_eq!(app.flashcards().card_index(), 1);
        assert!(!app.flashcards().is_revealed());

        app.handle(Action::Flashcard(FlashcardMove::Previous)).unwrap();
        assert_eq!(app.flashcards().card_index(), 0);

        app.handle(Action::Flashcard(FlashcardMove::Next)).unwrap();
        app.handle(Action::Flashcard(FlashcardMove::Restart)).unwrap();
        assert!(app.flashcards().is_first());
    }

    #[test]
    fn test_render_marks_active_view() {
        let mut app = app_with(&[("Soup", &["Water"])]);
        assert!(app.render().starts_with("[Recipes]"));
        assert!(app.render().contains("#1 Soup"));

        app.handle(Action::ShowView(View::Add)).unwrap();
        assert!(app.render().contains("[Add]"));
        assert!(app.render().contains("Add New Recipe"));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = app_with(&[("Soup", &["Water", "Salt", "Pepper"])]);
        let b = app_with(&[("Soup", &["Water", "Salt", "Pepper"])]);
        assert_eq!(a.matching().cards(), b.matching().cards());
    }
}
