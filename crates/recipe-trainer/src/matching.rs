//! Matching drill.
//!
//! Every ingredient of the chosen recipe becomes two cards: its name and its
//! amount. The player turns up two cards at a time; a name and its own amount
//! form a match. The verdict is not applied immediately: [`MatchingDrill::select`]
//! hands back a [`PendingResolution`] that the caller applies after a short
//! pause with [`MatchingDrill::resolve`], so both cards stay visible in the
//! meantime.
//!
//! Each (re)initialization starts a new generation. A resolution produced in
//! an older generation is refused, so a reset can never be undone by a timer
//! that was already running.

use std::fmt::{self, Write};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::model::Recipe;

/// Shown when there is nothing to play with.
pub const EMPTY_MESSAGE: &str = "Add some recipes first to play the matching game!";

/// Which side of an ingredient a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    /// The ingredient's name.
    Ingredient,
    /// The ingredient's amount and unit.
    Amount,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient => write!(f, "Ingredient"),
            Self::Amount => write!(f, "Amount"),
        }
    }
}

/// One card on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    /// Card id, `ing-<ingredient id>` or `amt-<ingredient id>`.
    pub id: String,
    /// Text on the card.
    pub content: String,
    /// Which side it shows.
    pub kind: CardKind,
    /// Id of the source ingredient, shared with exactly one other card.
    pub match_id: String,
    /// Already paired up.
    pub matched: bool,
}

/// Verdict on a pair of face-up cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A name and its own amount.
    Match,
    /// Anything else.
    Mismatch,
}

/// A verdict waiting for its display pause to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    generation: u64,
    first: usize,
    second: usize,
    verdict: Verdict,
}

impl PendingResolution {
    /// Whether the pair matched.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The drill generation this resolution belongs to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of selecting a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing changed.
    Ignored,
    /// The card is now the only face-up card.
    Selected,
    /// Second card turned up; apply the resolution after the pause.
    Pending(PendingResolution),
}

/// State of the matching drill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchingDrill {
    recipe_id: Option<String>,
    recipe_name: String,
    total_pairs: usize,
    cards: Vec<GameCard>,
    selected: Vec<usize>,
    match_count: usize,
    attempt_count: usize,
    generation: u64,
}

impl MatchingDrill {
    /// A drill with no recipe chosen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal a freshly shuffled table for `recipe` and zero the counters.
    pub fn initialize<R: Rng + ?Sized>(&mut self, recipe: &Recipe, rng: &mut R) {
        let mut cards = Vec::with_capacity(recipe.ingredient_count() * 2);
        for ingredient in &recipe.ingredients {
            cards.push(GameCard {
                id: format!("ing-{}", ingredient.id),
                content: ingredient.name.clone(),
                kind: CardKind::Ingredient,
                match_id: ingredient.id.clone(),
                matched: false,
            });
            cards.push(GameCard {
                id: format!("amt-{}", ingredient.id),
                content: ingredient.measure(),
                kind: CardKind::Amount,
                match_id: ingredient.id.clone(),
                matched: false,
            });
        }
        cards.shuffle(rng);

        self.recipe_id = Some(recipe.id.clone());
        self.recipe_name.clone_from(&recipe.name);
        self.total_pairs = recipe.ingredient_count();
        self.cards = cards;
        self.selected.clear();
        self.match_count = 0;
        self.attempt_count = 0;
        self.generation = self.generation.wrapping_add(1);
        debug!(
            "Dealt {} cards for '{}' (generation {})",
            self.cards.len(),
            recipe.name,
            self.generation
        );
    }

    /// Drop the table entirely, e.g. when the last recipe was deleted.
    pub fn clear(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Id of the recipe on the table.
    #[must_use]
    pub fn recipe_id(&self) -> Option<&str> {
        self.recipe_id.as_deref()
    }

    /// Cards in table order.
    #[must_use]
    pub fn cards(&self) -> &[GameCard] {
        &self.cards
    }

    /// Table positions of the face-up, unmatched cards.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Pairs found so far.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Pairs turned up so far.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempt_count
    }

    /// Number of pairs on the table.
    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every pair has been found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.recipe_id.is_some() && self.match_count == self.total_pairs
    }

    /// Turn up the card at table position `index`.
    ///
    /// Ignored for matched cards, cards already face-up, out-of-range
    /// positions, and while two cards are waiting to be resolved.
    pub fn select(&mut self, index: usize) -> SelectOutcome {
        let Some(card) = self.cards.get(index) else {
            return SelectOutcome::Ignored;
        };
        if card.matched || self.selected.len() >= 2 || self.selected.contains(&index) {
            return SelectOutcome::Ignored;
        }

        self.selected.push(index);
        if self.selected.len() < 2 {
            return SelectOutcome::Selected;
        }

        self.attempt_count += 1;
        let (first, second) = (self.selected[0], self.selected[1]);
        let (a, b) = (&self.cards[first], &self.cards[second]);
        let verdict = if a.match_id == b.match_id && a.kind != b.kind {
            Verdict::Match
        } else {
            Verdict::Mismatch
        };
        debug!("Attempt {}: {:?}", self.attempt_count, verdict);

        SelectOutcome::Pending(PendingResolution {
            generation: self.generation,
            first,
            second,
            verdict,
        })
    }

    /// Apply a resolution once its pause has elapsed.
    ///
    /// Returns `false` and changes nothing when the resolution belongs to an
    /// earlier deal.
    pub fn resolve(&mut self, pending: PendingResolution) -> bool {
        if pending.generation != self.generation
            || self.selected.as_slice() != [pending.first, pending.second]
        {
            debug!(
                "Discarding stale resolution from generation {}",
                pending.generation
            );
            return false;
        }

        if pending.verdict == Verdict::Match {
            let match_id = self.cards[pending.first].match_id.clone();
            for card in self.cards.iter_mut().filter(|c| c.match_id == match_id) {
                card.matched = true;
            }
            self.match_count += 1;
        }
        self.selected.clear();
        true
    }

    /// Render the recipe selector, counters and table.
    #[must_use]
    pub fn render(&self, recipes: &[Recipe]) -> String {
        if recipes.is_empty() || self.recipe_id.is_none() {
            return format!("{EMPTY_MESSAGE}\n");
        }

        let mut out = String::new();
        let _ = writeln!(out, "Matching Game: {}", self.recipe_name);
        let _ = writeln!(out, "Match ingredients with their measurements");
        out.push_str("Recipes:");
        for (i, recipe) in recipes.iter().enumerate() {
            let marker = if Some(recipe.id.as_str()) == self.recipe_id() {
                "*"
            } else {
                ""
            };
            let _ = write!(out, "  {}) {}{}", i + 1, recipe.name, marker);
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "Matches: {}/{}    Attempts: {}",
            self.match_count, self.total_pairs, self.attempt_count
        );

        if self.is_complete() {
            let _ = writeln!(
                out,
                "Congratulations! You completed the game in {} attempts!",
                self.attempt_count
            );
        }
        out.push('\n');

        for (i, card) in self.cards.iter().enumerate() {
            let state = if card.matched {
                "[x]"
            } else if self.selected.contains(&i) {
                "[*]"
            } else {
                "[ ]"
            };
            let _ = writeln!(
                out,
                "{state} {:>2}. {:<10} {}",
                i + 1,
                card.kind.to_string(),
                card.content
            );
        }
        out
    }
}
