//! Command dispatch and the interactive browse loop
//!
//! The browse loop is the front-end adapter of the navigation engine: it
//! renders the current screen after every successful navigation call and
//! maps user input back onto controller calls. Navigation calls for one
//! session are serialized by construction (one loop, one controller).

use std::io::{self, BufRead};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::application::services::{SessionService, WikiPayload};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::display::Action;
use crate::domain::error::DomainError;
use crate::domain::tree::Selector;
use crate::domain::Controller;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::store::JsonWikiStore;
use crate::infrastructure::traits::{Picker, SelectionItem, SkimPicker};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Item { query } => browse_query(cli, Query::Item(query.join(" "))),
        Commands::Monster { query } => browse_query(cli, Query::Monster(query.join(" "))),
        Commands::Level { level } => browse_query(cli, Query::Level(*level)),
        Commands::Config { command } => config_command(command),
        Commands::Info => info_command(cli),
        Commands::Completion { shell } => completion_command(*shell),
    }
}

enum Query {
    Item(String),
    Monster(String),
    Level(u32),
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load().map_err(CliError::App)?;
    if let Some(dataset) = &cli.dataset {
        settings.dataset = Some(dataset.clone());
    }
    Ok(settings)
}

fn browse_query(cli: &Cli, query: Query) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let idle_timeout = settings.idle_timeout();
    let container = ServiceContainer::new(settings)?;

    let tree = match &query {
        Query::Item(q) => container.item_query().search(q)?,
        Query::Monster(q) => container.monster_query().search(q)?,
        Query::Level(level) => container.levelling_query().lookup(*level)?,
    };

    let mut sessions: SessionService<WikiPayload> = SessionService::new(idle_timeout);
    let session_id = sessions.create(tree)?;

    render(&sessions.get(session_id)?.controller);
    if cli.non_interactive {
        sessions.destroy(session_id);
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        output::prompt(">");
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line.map_err(|e| {
            CliError::App(ApplicationError::OperationFailed {
                context: "read input".to_string(),
                source: Box::new(e),
            })
        })?;
        let input = line.trim();

        let controller = &mut sessions.get(session_id)?.controller;
        match input {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "n" | "next" => controller.goto_next_sibling(),
            "p" | "prev" => controller.goto_previous_sibling(),
            "f" | "first" => controller.goto_first_sibling(),
            "l" | "last" => controller.goto_last_sibling(),
            "b" | "back" => controller.goto_parent(),
            "bb" => {
                controller.goto_parent();
                controller.goto_parent();
            }
            "t" | "tree" => {
                output::info(&output::navigation_tree(
                    controller.tree(),
                    controller.current(),
                ));
                continue;
            }
            "s" | "pick" => {
                if let Err(e) = pick_child(controller) {
                    output::warning(&e);
                    continue;
                }
            }
            _ => match input.parse::<usize>() {
                Ok(number) => {
                    if let Err(e) = select_option(controller, number) {
                        output::warning(&e);
                        continue;
                    }
                }
                Err(_) => {
                    output::warning(&format!("unknown command: {input}"));
                    continue;
                }
            },
        }
        render(&sessions.get(session_id)?.controller);
    }

    sessions.destroy(session_id);
    Ok(())
}

/// Render the current screen. A missing renderer aborts only this render;
/// the session stays navigable.
fn render(controller: &Controller<WikiPayload>) {
    println!();
    match controller.content() {
        Ok(content) => output::screen(&content),
        Err(e) => {
            debug!(error = %e, "content render failed");
            output::warning(&e);
        }
    }
    match controller.actions() {
        Ok(actions) => output::actions(&actions),
        Err(e) => {
            debug!(error = %e, "action render failed");
            output::warning(&e);
        }
    }
}

/// Current screen's drill-down menu, if it offers one.
fn select_menu(
    controller: &Controller<WikiPayload>,
) -> Result<crate::domain::display::SelectMenu, DomainError> {
    let actions = controller.actions()?;
    actions
        .into_iter()
        .find_map(|action| match action {
            Action::Select(menu) => Some(menu),
            _ => None,
        })
        .ok_or_else(|| DomainError::NotFound {
            selector: "(no menu on this screen)".to_string(),
        })
}

/// Descend via the numbered menu entry.
fn select_option(
    controller: &mut Controller<WikiPayload>,
    number: usize,
) -> Result<(), DomainError> {
    let menu = select_menu(controller)?;
    let option = number
        .checked_sub(1)
        .and_then(|i| menu.options.get(i))
        .ok_or_else(|| DomainError::NotFound {
            selector: format!("menu entry {number}"),
        })?;
    controller.goto_child(Selector::Id(option.target))
}

/// Descend via the fuzzy picker.
fn pick_child(controller: &mut Controller<WikiPayload>) -> Result<(), DomainError> {
    let menu = select_menu(controller)?;
    let items: Vec<SelectionItem> = menu
        .options
        .iter()
        .map(|option| SelectionItem {
            display: option.label.clone(),
            value: option.label.clone(),
        })
        .collect();
    let picked = SkimPicker
        .pick_one(&items, &menu.placeholder)
        .map_err(|message| DomainError::NotFound { selector: message })?;
    let Some(picked) = picked else {
        return Ok(()); // cancelled
    };
    let target = menu
        .options
        .iter()
        .find(|option| option.label == picked.display)
        .map(|option| option.target)
        .ok_or_else(|| DomainError::NotFound {
            selector: picked.display.clone(),
        })?;
    controller.goto_child(Selector::Id(target))
}

fn config_command(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load().map_err(CliError::App)?;
            output::info(&settings.to_toml().map_err(CliError::App)?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available"),
        },
    }
    Ok(())
}

fn info_command(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let path = settings.dataset_path();
    let store = JsonWikiStore::open(&path)?;
    let dataset = store.dataset();
    output::header("Dataset");
    output::detail(&format!("path: {}", path.display()));
    output::detail(&format!("items: {}", dataset.items.len()));
    output::detail(&format!("item leaves: {}", dataset.item_leaves.len()));
    output::detail(&format!("monsters: {}", dataset.monsters.len()));
    output::detail(&format!(
        "monster leaves: {}",
        dataset.monster_leaves.len()
    ));
    output::detail(&format!("leveling tables: {}", dataset.levelling.len()));
    Ok(())
}

fn completion_command(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
