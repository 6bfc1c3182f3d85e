//! CLI parse: clap types for the ledger. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Empledger CLI - deterministic employee record ledger
#[derive(Parser)]
#[command(name = "empledger")]
#[command(about = "Deterministic employee record ledger with key lookups and rich queries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the ledger with one employee record
    Init {
        id: String,
        name: String,
        department: String,
        /// Decimal salary
        #[arg(allow_hyphen_values = true)]
        salary: String,
        location: String,
    },
    /// Invoke a ledger operation and print its response envelope
    Invoke {
        /// Operation name (see `operations`)
        operation: String,
        /// Operation arguments, passed as plain text
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// List supported operations and their arities
    Operations,
    /// Print the effective configuration as TOML
    Config,
}
