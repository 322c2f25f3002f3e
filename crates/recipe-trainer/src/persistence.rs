//! Persistence adapter for the recipe collection.
//!
//! The whole collection is one JSON array stored under one fixed key. Reads
//! and writes never fail from the caller's point of view: problems are logged
//! and turned into an empty collection (read) or a skipped write.

use std::fmt;

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::Result;
use crate::model::Recipe;
use crate::storage::Storage;

/// Load/save contract the repository persists through.
pub trait RecipePersistence: fmt::Debug {
    /// Read the full collection. Returns an empty list on any failure.
    fn load(&self) -> Vec<Recipe>;

    /// Replace the stored collection with `recipes`. Failures are logged.
    fn save(&self, recipes: &[Recipe]);
}

/// [`RecipePersistence`] backed by the local key-value [`Storage`].
#[derive(Debug)]
pub struct RecipeStore {
    storage: Storage,
    key: String,
}

impl RecipeStore {
    /// Store the collection in `storage` under `key`.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Open the configured database.
    ///
    /// If the database file cannot be opened the session still runs against
    /// an in-memory store, so nothing will outlive the process.
    ///
    /// # Errors
    ///
    /// Returns an error only if the in-memory fallback cannot be created
    /// either.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.database_path();
        let storage = match Storage::open(&path) {
            Ok(storage) => storage,
            Err(e) => {
                error!("{e}; recipes will not be saved this session");
                Storage::open_in_memory()?
            }
        };
        Ok(Self::new(storage, config.storage.storage_key.clone()))
    }

    /// The key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl RecipePersistence for RecipeStore {
    fn load(&self) -> Vec<Recipe> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => {
                debug!("No stored recipes under '{}'", self.key);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to load recipes from storage: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, recipes: &[Recipe]) {
        let raw = match serde_json::to_string(recipes) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize recipes: {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &raw) {
            error!("Failed to save recipes to storage: {e}");
        } else {
            debug!("Saved {} recipes", recipes.len());
        }
    }
}

/// Parse a stored document.
///
/// Text fields a different schema might omit fall back to empty values; a
/// document missing identity fields or with the wrong JSON types is rejected
/// as a whole. Blank-named ingredient rows are removed, and recipes left
/// without any ingredient are dropped since the drills cannot show them.
#[must_use]
pub fn decode(raw: &str) -> Vec<Recipe> {
    let recipes: Vec<Recipe> = match serde_json::from_str(raw) {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!("Stored recipe document is unreadable, starting empty: {e}");
            return Vec::new();
        }
    };

    recipes
        .into_iter()
        .filter_map(|mut recipe| {
            let before = recipe.ingredient_count();
            recipe.ingredients.retain(|i| !i.name.trim().is_empty());
            if recipe.ingredients.is_empty() {
                warn!(
                    "Dropping stored recipe '{}' ({}): no named ingredients",
                    recipe.name, recipe.id
                );
                return None;
            }
            if recipe.ingredient_count() < before {
                warn!(
                    "Stored recipe '{}' ({}) had {} blank ingredient rows",
                    recipe.name,
                    recipe.id,
                    before - recipe.ingredient_count()
                );
            }
            Some(recipe)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ingredient;
    use chrono::{TimeZone, Utc};

    const KEY: &str = "recipe-memory-trainer-recipes";

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            description: String::new(),
            ingredients: ingredients
                .iter()
                .enumerate()
                .map(|(i, name)| Ingredient {
                    id: format!("ing-{id}-{i}"),
                    name: (*name).to_string(),
                    amount: "1".to_string(),
                    unit: "cup".to_string(),
                })
                .collect(),
            instructions: vec!["Mix".to_string(), "Bake".to_string()],
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    fn store() -> RecipeStore {
        RecipeStore::new(Storage::open_in_memory().unwrap(), KEY)
    }

    #[test]
    fn test_load_empty_storage() {
        assert!(store().load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = store();
        let recipes = vec![recipe("a", &["Flour", "Milk"]), recipe("b", &["Egg"])];

        store.save(&recipes);
        let loaded = store.load();
        assert_eq!(loaded, recipes);

        // Saving an unmodified loaded collection changes nothing
        store.save(&loaded);
        assert_eq!(store.load(), recipes);
    }

    #[test]
    fn test_save_replaces_prior_content() {
        let store = store();
        store.save(&[recipe("a", &["Flour"]), recipe("b", &["Egg"])]);
        store.save(&[recipe("b", &["Egg"])]);

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
    }

    #[test]
    fn test_corrupt_document_loads_empty() {
        let store = store();
        store.storage().set(KEY, "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let store = store();
        store
            .storage()
            .set(KEY, r#"[{"id": "x", "createdAt": 0}]"#)
            .unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_decode_coerces_missing_text_fields() {
        let raw = r#"[{"id":"r","name":"Toast","ingredients":[{"id":"i","name":"Bread"}],"createdAt":5}]"#;
        let recipes = decode(raw);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].ingredients[0].measure(), "");
    }

    #[test]
    fn test_decode_drops_recipes_without_named_ingredients() {
        let raw = serde_json::to_string(&vec![recipe("a", &[" "]), recipe("b", &["Egg"])]).unwrap();
        let recipes = decode(&raw);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "b");
    }

    #[test]
    fn test_decode_strips_blank_ingredient_rows() {
        let raw = serde_json::to_string(&vec![recipe("a", &["Flour", "  ", "Milk"])]).unwrap();
        let recipes = decode(&raw);
        assert_eq!(recipes.len(), 1);

        let names: Vec<&str> = recipes[0]
            .ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["Flour", "Milk"]);
        assert_eq!(recipes[0].ingredients[1].id, "ing-a-2");
    }

    #[test]
    fn test_key_accessor() {
        assert_eq!(store().key(), KEY);
    }

    #[test]
    fn test_open_from_config_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(dir.path().join("nested").join("recipes.db"));
        config.storage.storage_key = "custom-key".to_string();

        let store = RecipeStore::open(&config).unwrap();
        assert_eq!(store.key(), "custom-key");
        store.save(&[recipe("a", &["Flour"])]);
        drop(store);

        let reopened = RecipeStore::open(&config).unwrap();
        assert_eq!(reopened.load().len(), 1);
    }

    #[test]
    fn test_open_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(blocker.join("recipes.db"));

        let store = RecipeStore::open(&config).unwrap();
        assert_eq!(store.storage().path(), std::path::Path::new(":memory:"));
        store.save(&[recipe("a", &["Flour"])]);
        assert_eq!(store.load().len(), 1);
    }
}
