//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Game-wiki query engine: search and browse items, monsters and leveling spots
#[derive(Parser, Debug)]
#[command(name = "loreseek")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Dataset file (default: from config)
    #[arg(long, global = true, env = "LORESEEK_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Print the first screen and exit instead of browsing interactively
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search items and browse the results
    Item {
        /// Words of the item name
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Search monsters and browse the results
    Monster {
        /// Words of the monster name
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Look up leveling spots for a character level
    Level {
        /// Character level
        level: u32,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show dataset status
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Print the global config file path
    Path,
}
