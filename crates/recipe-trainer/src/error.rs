//! Error types for recipe-trainer.
//!
//! Most user-facing paths in this crate fail soft (persistence logs and falls
//! back to defaults), so these errors mostly surface from storage setup,
//! configuration loading and the one-shot CLI commands.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recipe-trainer operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Recipe Errors ===
    /// No recipe matched the given id or position.
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// User-supplied input could not be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for recipe-trainer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a recipe-not-found error for the given id or position.
    #[must_use]
    pub fn recipe_not_found(reference: impl Into<String>) -> Self {
        Self::RecipeNotFound(reference.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this error means the requested recipe does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecipeNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_errors() {
        let err = Error::recipe_not_found("#4");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "recipe not found: #4");

        let err = Error::invalid_input("unknown view: pantry");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "invalid input: unknown view: pantry");
    }

    #[test]
    fn test_storage_errors_convert() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::DatabaseQuery(_)));

        let err: Error = serde_json::from_str::<Vec<u8>>("[").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_config_load_error_is_boxed() {
        let figment_err = figment::Figment::new()
            .extract_inner::<u64>("drill.match_delay_ms")
            .unwrap_err();
        let err: Error = figment_err.into();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_directory_create_names_path() {
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/readonly/recipe-trainer"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/readonly/recipe-trainer"));
    }
}
