//! `recipe-trainer` - Memorize recipes with flashcards and a matching game
//!
//! This library keeps a small recipe collection in a local SQLite key-value
//! store and provides the study drills built on top of it: a flashcard walk
//! over every ingredient and a pairs game matching ingredient names to their
//! measurements.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod browser;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod flashcards;
pub mod logging;
pub mod matching;
pub mod model;
pub mod persistence;
pub mod repository;
pub mod session;
pub mod storage;
pub mod timer;

pub use app::{Action, App, Effect, View};
pub use config::Config;
pub use editor::{RecipeDraft, ValidationError};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Ingredient, NewRecipe, Recipe};
pub use persistence::{RecipePersistence, RecipeStore};
pub use repository::RecipeRepository;
pub use storage::{Storage, StorageStats};
pub use timer::{ResolutionDelays, ResolutionTimer};
