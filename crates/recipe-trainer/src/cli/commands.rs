//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Subcommand};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Recipe id, or its position in the list (e.g. `#2`)
    pub recipe: String,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Recipe name
    #[arg(short, long)]
    pub name: String,

    /// Short description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Ingredient as `name|amount|unit` (repeatable)
    #[arg(short, long = "ingredient", value_name = "NAME|AMOUNT|UNIT")]
    pub ingredients: Vec<IngredientArg>,

    /// Instruction step (repeatable)
    #[arg(short, long = "step", value_name = "TEXT")]
    pub steps: Vec<String>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Recipe id, or its position in the list (e.g. `#2`)
    pub recipe: String,
}

/// Matching game arguments.
#[derive(Debug, Args)]
pub struct MatchCommand {
    /// Recipe to play, by id or position. Defaults to the first recipe.
    #[arg(short, long)]
    pub recipe: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// One `--ingredient` value.
///
/// Amount and unit may be left out: `Salt` and `Milk|2` are both accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientArg {
    /// Ingredient name.
    pub name: String,
    /// Quantity text.
    pub amount: String,
    /// Unit text.
    pub unit: String,
}

impl FromStr for IngredientArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|').map(str::trim);
        let name = parts.next().unwrap_or_default().to_string();
        let amount = parts.next().unwrap_or_default().to_string();
        let unit = parts.next().unwrap_or_default().to_string();
        if parts.next().is_some() {
            return Err(format!("expected name|amount|unit, got '{s}'"));
        }
        Ok(Self { name, amount, unit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_arg_full() {
        let arg: IngredientArg = "Flour | 2 | cups".parse().unwrap();
        assert_eq!(
            arg,
            IngredientArg {
                name: "Flour".to_string(),
                amount: "2".to_string(),
                unit: "cups".to_string(),
            }
        );
    }

    #[test]
    fn test_ingredient_arg_name_only() {
        let arg: IngredientArg = "Salt".parse().unwrap();
        assert_eq!(arg.name, "Salt");
        assert!(arg.amount.is_empty());
        assert!(arg.unit.is_empty());
    }

    #[test]
    fn test_ingredient_arg_too_many_parts() {
        assert!("a|b|c|d".parse::<IngredientArg>().is_err());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_match_command_debug() {
        let cmd = MatchCommand {
            recipe: Some("#1".to_string()),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("recipe"));
    }
}
