//! `rtrain` - CLI for recipe-trainer
//!
//! This binary provides the one-shot recipe commands and the interactive
//! drill sessions.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use recipe_trainer::browser::{self, RecipeSummary};
use recipe_trainer::cli::{AddCommand, Cli, Command, ConfigCommand};
use recipe_trainer::editor::{IngredientField, RecipeDraft};
use recipe_trainer::{
    init_logging, session, Action, App, Config, RecipeRepository, RecipeStore, ResolutionDelays,
    Storage, View,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => handle_list(&open_repository(&config)?, cmd.json),
        Command::Show(cmd) => {
            let repository = open_repository(&config)?;
            print!("{}", browser::render_recipe(repository.find(&cmd.recipe)?));
            Ok(())
        }
        Command::Add(cmd) => handle_add(&mut open_repository(&config)?, cmd),
        Command::Delete(cmd) => {
            let mut repository = open_repository(&config)?;
            let recipe = repository.find(&cmd.recipe)?;
            let (id, name) = (recipe.id.clone(), recipe.name.clone());
            repository.delete(&id);
            println!("Deleted {name} [{id}]");
            Ok(())
        }
        Command::Shell => run_session(&config, View::Recipes, None),
        Command::Flashcards => run_session(&config, View::Flashcards, None),
        Command::Match(cmd) => run_session(&config, View::Game, cmd.recipe),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_repository(config: &Config) -> Result<RecipeRepository> {
    let store = RecipeStore::open(config).context("failed to open recipe storage")?;
    Ok(RecipeRepository::load(Box::new(store)))
}

fn handle_list(repository: &RecipeRepository, json: bool) -> Result<()> {
    if json {
        let summaries: Vec<RecipeSummary<'_>> =
            repository.recipes().iter().map(RecipeSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print!("{}", browser::render_list(repository.recipes()));
        if !repository.is_empty() {
            println!();
            println!(
                "{} recipes, {} ingredients",
                repository.len(),
                repository.total_ingredients()
            );
        }
    }
    Ok(())
}

fn handle_add(repository: &mut RecipeRepository, cmd: AddCommand) -> Result<()> {
    let mut draft = RecipeDraft::new();
    draft.set_name(cmd.name);
    draft.set_description(cmd.description);

    for (index, ingredient) in cmd.ingredients.into_iter().enumerate() {
        if index > 0 {
            draft.add_ingredient();
        }
        draft.update_ingredient(index, IngredientField::Name, ingredient.name);
        draft.update_ingredient(index, IngredientField::Amount, ingredient.amount);
        draft.update_ingredient(index, IngredientField::Unit, ingredient.unit);
    }
    for (index, step) in cmd.steps.into_iter().enumerate() {
        if index > 0 {
            draft.add_instruction();
        }
        draft.update_instruction(index, step);
    }

    let new = draft.submit().context("recipe not saved")?;
    let recipe = repository.append(new);
    println!(
        "Added {} [{}] with {} ingredients",
        recipe.name,
        recipe.id,
        recipe.ingredient_count()
    );
    Ok(())
}

fn run_session(config: &Config, view: View, recipe: Option<String>) -> Result<()> {
    let mut app = App::new(open_repository(config)?, config.drill.shuffle_seed);
    app.handle(Action::ShowView(view))?;
    if let Some(reference) = recipe {
        app.handle(Action::SwitchRecipe(reference))?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let delays = ResolutionDelays::from_config(config);
    runtime.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        session::run(&mut app, delays, stdin, &mut stdout).await
    })?;

    info!("Goodbye");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Storage key:        {}", config.storage.storage_key);
                println!();
                println!("[Drill]");
                println!("  Match delay (ms):   {}", config.drill.match_delay_ms);
                println!("  Mismatch delay (ms): {}", config.drill.mismatch_delay_ms);
                match config.drill.shuffle_seed {
                    Some(seed) => println!("  Shuffle seed:       {seed}"),
                    None => println!("  Shuffle seed:       random"),
                }
                println!();
                println!("[Database]");
                let path = config.database_path();
                if path.exists() {
                    let stats = Storage::open(&path)?.stats()?;
                    println!("  Stored keys:        {}", stats.key_count);
                    println!("  Size (bytes):       {}", stats.db_size_bytes);
                } else {
                    println!("  Not created yet");
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
