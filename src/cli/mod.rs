//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::persistence::Backend;

pub mod commands;

/// Output format for list and totals commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON (same as --json)
    Json,
}

/// kishop - a budget-aware shopping list
#[derive(Parser, Debug)]
#[command(name = "kishop", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path for `serve` (default: ~/.kishop/data/shopping.db)
    #[arg(long, global = true, env = "KISHOP_DB")]
    pub db: Option<PathBuf>,

    /// Where the list lives (overrides the settings file)
    #[arg(long, value_enum, global = true, env = "KISHOP_BACKEND")]
    pub backend: Option<Backend>,

    /// Server base URL for the remote backend
    #[arg(long, global = true, env = "KISHOP_API_URL")]
    pub api_url: Option<String>,

    /// Directory for local snapshot files (default: ~/.kishop/local)
    #[arg(long, global = true, env = "KISHOP_LOCAL_DIR")]
    pub local_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (text, json)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no logging; errors only in --json mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the REST API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = crate::server::DEFAULT_PORT)]
        port: u16,
    },

    /// Show or change the spending cap
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },

    /// Edit list rows
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Show totals and budget status
    Totals,

    /// Move legacy local data to the server
    Migrate,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Budget Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Show the current budget
    Show,

    /// Set the budget (0 disables highlighting)
    Set {
        /// New budget; non-numeric input counts as 0
        value: String,
    },
}

// ============================================================================
// Item Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List rows with totals
    List,

    /// Fill the open entry row and start a new one
    Add {
        /// Quantity (default 1)
        #[arg(long, short = 'n')]
        quantity: Option<String>,

        /// Unit price
        #[arg(long, short)]
        price: Option<String>,
    },

    /// Change a row
    Set {
        /// Row number as shown by `item list` (1-based)
        index: usize,

        /// New quantity
        #[arg(long, short = 'n')]
        quantity: Option<String>,

        /// New unit price
        #[arg(long, short)]
        price: Option<String>,
    },

    /// Delete a row
    #[command(alias = "rm")]
    Delete {
        /// Row number as shown by `item list` (1-based)
        index: usize,
    },

    /// Finish editing: reorder if configured and open a new entry row
    Commit,

    /// Sort rows by completeness
    Sort,

    /// Delete every row
    Clear {
        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}
