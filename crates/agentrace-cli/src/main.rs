//! Agentrace CLI - Compile and browse recorded AI coding agent sessions.
//!
//! Two modes of operation:
//! - **Interactive (TUI)**: `agentrace <path>` opens the timeline viewer
//! - **CLI**: Subcommands like `view`, `outline`, `info`, `link` output to stdout for scripting

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod tui;

#[derive(Parser)]
#[command(name = "agentrace")]
#[command(author, version, about = "Compile and browse recorded AI coding agent sessions", long_about = None)]
struct Cli {
    /// Path to an event log to open in the interactive viewer (TUI mode)
    path: Option<PathBuf>,

    /// Jump to a block permalink fragment on open (e.g. event-<block-id>)
    #[arg(long)]
    goto: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled timeline to stdout
    View {
        /// Path to the event log (JSON array or JSONL)
        path: PathBuf,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,

        /// Filter by block type (text, thinking, tool_group, local_command_group, ...)
        #[arg(short = 't', long = "type")]
        block_type: Option<String>,
    },

    /// Print the navigation index (one line per primary message)
    Outline {
        /// Path to the event log (JSON array or JSONL)
        path: PathBuf,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,
    },

    /// Show session statistics and block counts
    Info {
        /// Path to the event log (JSON array or JSONL)
        path: PathBuf,

        /// Output as JSON (for machine consumption)
        #[arg(long)]
        json: bool,
    },

    /// Resolve a block id to its permalink fragment
    Link {
        /// Path to the event log (JSON array or JSONL)
        path: PathBuf,

        /// Block id (or an event-<id> fragment) to resolve
        target: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::View {
            path,
            json,
            block_type,
        }) => commands::view::run(&path, json, block_type.as_deref()),
        Some(Commands::Outline { path, json }) => commands::outline::run(&path, json),
        Some(Commands::Info { path, json }) => commands::info::run(&path, json),
        Some(Commands::Link { path, target }) => commands::link::run(&path, &target),
        None => match cli.path {
            Some(path) => tui::run_tui(&path, cli.goto.as_deref()),
            None => {
                // No path and no subcommand: nothing to browse
                anyhow::bail!("no event log given; run `agentrace --help` for usage")
            }
        },
    }
}
