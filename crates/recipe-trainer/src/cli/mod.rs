//! Command-line interface for recipe-trainer.
//!
//! This module provides the CLI structure for the `rtrain` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, IngredientArg, ListCommand, MatchCommand,
    ShowCommand,
};

/// rtrain - Memorize your recipes
///
/// Keep a small recipe collection and drill its ingredients with flashcards
/// and a matching game.
#[derive(Debug, Parser)]
#[command(name = "rtrain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored recipes
    List(ListCommand),

    /// Show one recipe
    Show(ShowCommand),

    /// Add a recipe
    Add(AddCommand),

    /// Delete a recipe
    Delete(DeleteCommand),

    /// Start an interactive session
    Shell,

    /// Practice ingredient amounts with flashcards
    Flashcards,

    /// Play the ingredient matching game
    Match(MatchCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Shell,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "rtrain");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list_json() {
        let cli = Cli::try_parse_from(["rtrain", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::List(ListCommand { json: true })));
    }

    #[test]
    fn test_parse_show_position() {
        let cli = Cli::try_parse_from(["rtrain", "show", "#2"]).unwrap();
        let Command::Show(show) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(show.recipe, "#2");
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "rtrain",
            "add",
            "--name",
            "Pancakes",
            "--ingredient",
            "Flour|2|cups",
            "-i",
            "Milk|1|cup",
            "--step",
            "Whisk",
        ])
        .unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.name, "Pancakes");
        assert_eq!(add.description, "");
        assert_eq!(add.ingredients.len(), 2);
        assert_eq!(add.ingredients[1].name, "Milk");
        assert_eq!(add.steps, vec!["Whisk".to_string()]);
    }

    #[test]
    fn test_parse_add_requires_name() {
        assert!(Cli::try_parse_from(["rtrain", "add", "-i", "Flour"]).is_err());
    }

    #[test]
    fn test_parse_match_recipe() {
        let cli = Cli::try_parse_from(["rtrain", "match", "--recipe", "#3"]).unwrap();
        let Command::Match(cmd) = cli.command else {
            panic!("expected match");
        };
        assert_eq!(cmd.recipe.as_deref(), Some("#3"));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["rtrain", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            Cli::try_parse_from(["rtrain", "flashcards", "-c", "/custom/config.toml", "-vv"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Flashcards));
    }
}
