//! # Subscribe CLI Module
//!
//! ## Available Commands
//!
//! - `init` - Write an empty snapshot
//! - `index` - Relate a subscriber to an item under one or more names
//! - `unindex` - Remove a relationship
//! - `search` - Run a JSON query
//! - `status` - Show relationship names and edge counts
//! - `export` - Write the catalog as JSON
//! - `key` - Print the subscription key for a relationship

mod commands;

use crate::config::Settings;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use subscribe_core::SubscribeError;
use subscribe_core::primitives::DEFAULT_NAMESPACE;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Subscribe - bidirectional subscription catalog
///
/// Records which subscribers are related to which content items, by
/// relationship name, and answers queries in both directions.
#[derive(Parser, Debug)]
#[command(name = "subscribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a subscribe.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the catalog snapshot (overrides config and environment)
    #[arg(short = 'S', long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Suppress confirmation messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One relationship edge, possibly under several names.
#[derive(Args, Debug, Clone)]
pub struct EdgeArgs {
    /// Subscriber namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Subscriber identifier within the namespace
    #[arg(long)]
    pub id: String,

    /// Item UID
    #[arg(long)]
    pub uid: String,

    /// Relationship name (repeatable)
    #[arg(long = "name", required = true)]
    pub names: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new empty snapshot
    Init {
        /// Overwrite an existing snapshot
        #[arg(short, long)]
        force: bool,
    },

    /// Relate a subscriber to an item
    Index(EdgeArgs),

    /// Remove a relationship between a subscriber and an item
    Unindex(EdgeArgs),

    /// Search the catalog with a JSON query
    Search {
        /// `"UID"`, `["namespace", "id"]`, or `{"name": criterion, ...}`
        #[arg(long)]
        query: String,
    },

    /// Show catalog status
    Status,

    /// Export the catalog as JSON
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the subscription key for one relationship
    Key {
        #[arg(long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,

        #[arg(long)]
        id: String,

        #[arg(long)]
        uid: String,

        #[arg(long)]
        name: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute<W: Write>(cli: &Cli, settings: &Settings, out: &mut W) -> Result<(), SubscribeError> {
    let ctx = Context {
        snapshot: settings.snapshot.as_path(),
        json_mode: cli.json_mode,
        quiet: cli.quiet,
    };

    match &cli.command {
        Some(Commands::Init { force }) => cmd_init(&ctx, *force, out),
        Some(Commands::Index(edge)) => cmd_index(&ctx, edge, out),
        Some(Commands::Unindex(edge)) => cmd_unindex(&ctx, edge, out),
        Some(Commands::Search { query }) => cmd_search(&ctx, query, out),
        Some(Commands::Export { output }) => cmd_export(&ctx, output, out),
        Some(Commands::Key {
            namespace,
            id,
            uid,
            name,
        }) => cmd_key(&ctx, namespace, id, uid, name, out),
        // No subcommand - show status by default
        Some(Commands::Status) | None => cmd_status(&ctx, out),
    }
}
