//! Line-oriented interactive session.
//!
//! Each input line is parsed against the active view into an [`Action`],
//! applied to the [`App`], and the view is printed again. Matching verdicts
//! come back through a [`ResolutionTimer`] once their pause has elapsed and
//! are applied the same way.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::{Action, App, DraftEdit, Effect, FlashcardMove, View};
use crate::browser;
use crate::editor::IngredientField;
use crate::error::Result;
use crate::timer::{ResolutionDelays, ResolutionTimer};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply an action to the app.
    Apply(Action),
    /// Print one recipe by id or position.
    Show(String),
    /// Print the commands for the active view.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Nothing,
}

const GLOBAL_HELP: &str = "\
  view recipes|add|flashcards|game   switch view
  help                               show this help
  quit                               leave";

const RECIPES_HELP: &str = "\
  show <n>                           show one recipe
  delete <n>                         delete a recipe";

const ADD_HELP: &str = "\
  name <text>                        set the name
  desc <text>                        set the description
  ing add | ing rm <n>               add or remove an ingredient row
  ing <n> name|amount|unit <text>    edit an ingredient
  step add | step rm <n>             add or remove a step
  step <n> <text>                    edit a step
  save | clear                       store the recipe or start over";

const FLASHCARDS_HELP: &str = "\
  next | prev                        move between cards
  flip                               show or hide the answer
  restart                            back to the first card";

const GAME_HELP: &str = "\
  <n>                                turn up card n
  reset                              deal again
  recipe <n>                         play another recipe";

/// Help text for `view`.
#[must_use]
pub fn help(view: View) -> String {
    let specific = match view {
        View::Recipes => RECIPES_HELP,
        View::Add => ADD_HELP,
        View::Flashcards => FLASHCARDS_HELP,
        View::Game => GAME_HELP,
    };
    format!("{view} commands:\n{specific}\n{GLOBAL_HELP}\n")
}

/// Parse one input line in the context of the active view.
///
/// Positions typed by the user start at 1.
///
/// # Errors
///
/// Returns a message for the user when the line is not a command of `view`.
pub fn parse_command(view: View, line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = split_word(line);

    match word {
        "" => return Ok(Command::Nothing),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "view" => {
            let view = rest.parse::<View>().map_err(|e| e.to_string())?;
            return Ok(Command::Apply(Action::ShowView(view)));
        }
        _ => {}
    }

    let action = match view {
        View::Recipes => match word {
            "show" => return Ok(Command::Show(required(rest, "show <n>")?.to_string())),
            "delete" | "rm" => Action::DeleteRecipe(required(rest, "delete <n>")?.to_string()),
            _ => return Err(unknown(view, word)),
        },
        View::Add => Action::Draft(match word {
            "name" => DraftEdit::SetName(rest.to_string()),
            "desc" | "description" => DraftEdit::SetDescription(rest.to_string()),
            "ing" => parse_ingredient_edit(rest)?,
            "step" => parse_step_edit(rest)?,
            "save" => return Ok(Command::Apply(Action::SubmitDraft)),
            "clear" => DraftEdit::Clear,
            _ => return Err(unknown(view, word)),
        }),
        View::Flashcards => Action::Flashcard(match word {
            "next" | "n" => FlashcardMove::Next,
            "prev" | "p" => FlashcardMove::Previous,
            "flip" | "f" => FlashcardMove::Flip,
            "restart" => FlashcardMove::Restart,
            _ => return Err(unknown(view, word)),
        }),
        View::Game => match word {
            "reset" => Action::ResetGame,
            "recipe" => Action::SwitchRecipe(required(rest, "recipe <n>")?.to_string()),
            _ if word.chars().all(|c| c.is_ascii_digit()) => Action::SelectCard(position(word)?),
            _ => return Err(unknown(view, word)),
        },
    };
    Ok(Command::Apply(action))
}

fn parse_ingredient_edit(rest: &str) -> std::result::Result<DraftEdit, String> {
    let (first, rest) = split_word(rest);
    match first {
        "add" => Ok(DraftEdit::AddIngredient),
        "rm" => Ok(DraftEdit::RemoveIngredient(position(required(rest, "ing rm <n>")?)?)),
        "" => Err("usage: ing add | ing rm <n> | ing <n> name|amount|unit <text>".to_string()),
        n => {
            let index = position(n)?;
            let (field, value) = split_word(rest);
            let field = field.parse::<IngredientField>()?;
            Ok(DraftEdit::UpdateIngredient(index, field, value.to_string()))
        }
    }
}

fn parse_step_edit(rest: &str) -> std::result::Result<DraftEdit, String> {
    let (first, rest) = split_word(rest);
    match first {
        "add" => Ok(DraftEdit::AddInstruction),
        "rm" => Ok(DraftEdit::RemoveInstruction(position(required(rest, "step rm <n>")?)?)),
        "" => Err("usage: step add | step rm <n> | step <n> <text>".to_string()),
        n => Ok(DraftEdit::UpdateInstruction(position(n)?, rest.to_string())),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn required<'a>(value: &'a str, usage: &str) -> std::result::Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value)
    }
}

/// Turn a 1-based position into an index.
fn position(s: &str) -> std::result::Result<usize, String> {
    s.trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("not a position: {s}"))
}

fn unknown(view: View, word: &str) -> String {
    format!("unknown command in {view}: {word} (type 'help')")
}

/// Run the session until `quit` or end of input.
///
/// When input ends while a matching verdict is still pausing, the verdict is
/// waited for and applied before returning.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R, W>(
    app: &mut App,
    delays: ResolutionDelays,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tx, mut rx) = mpsc::channel(4);
    let mut timer = ResolutionTimer::new(tx);
    let mut lines = input.lines();
    let mut input_done = false;
    let mut awaiting = false;

    info!("Session started in {} view", app.view());
    show(app, out)?;

    loop {
        if input_done && !awaiting {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if !input_done => {
                let Some(line) = line? else {
                    input_done = true;
                    continue;
                };
                match parse_command(app.view(), &line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Nothing) => {}
                    Ok(Command::Help) => write!(out, "{}", help(app.view()))?,
                    Ok(Command::Show(reference)) => match app.repository().find(&reference) {
                        Ok(recipe) => write!(out, "{}", browser::render_recipe(recipe))?,
                        Err(e) => writeln!(out, "{e}")?,
                    },
                    Ok(Command::Apply(action)) => match app.handle(action) {
                        Ok(effect) => {
                            match effect {
                                Effect::None => {}
                                Effect::Schedule(pending) => {
                                    timer.schedule(pending, delays.for_verdict(pending.verdict()));
                                    awaiting = true;
                                }
                                Effect::CancelPending => {
                                    timer.cancel();
                                    awaiting = false;
                                }
                            }
                            show(app, out)?;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    },
                    Err(message) => writeln!(out, "{message}")?,
                }
            }
            Some(pending) = rx.recv() => {
                awaiting = false;
                app.handle(Action::Resolve(pending))?;
                show(app, out)?;
            }
            else => break,
        }
    }

    timer.cancel();
    debug!("Session ended");
    Ok(())
}

fn show<W: Write>(app: &App, out: &mut W) -> Result<()> {
    writeln!(out, "{}", app.render())?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
