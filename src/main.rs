//! # Tasknest
//!
//! A small in-memory task tracker with an interactive terminal UI.
//!
//! Tasks live for the length of a session. Nothing is saved unless you ask
//! for an export, which is written as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive session (empty)
//! tasknest
//!
//! # Interactive session preloaded with sample tasks
//! tasknest ui --demo
//!
//! # Print the sample data set as tables, or as the JSON export
//! tasknest demo
//! tasknest demo --json
//! tasknest demo --save
//! ```
//!
//! ## Export location
//!
//! Exports are written to `--export-dir`, the `TASKNEST_EXPORT_DIR`
//! environment variable, or the local data directory
//! (`~/.local/share/tasknest` on Linux).
//!
//! ## Logging
//!
//! Set `TASKNEST_LOG` to an `EnvFilter` directive (e.g. `tasknest=debug`) to
//! log to stderr.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use tasknest::commands::{cmd_demo, seed_demo, DemoOptions};
use tasknest::storage::export_dir;
use tasknest::tui::run_tui;
use tasknest::TaskManager;

#[derive(Parser)]
#[command(name = "tasknest")]
#[command(about = "In-memory terminal task tracker", long_about = None)]
struct Cli {
    /// Directory exports are saved to
    #[arg(long, global = true, env = "TASKNEST_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive session
    Ui {
        /// Start with the sample tasks loaded
        #[arg(short, long)]
        demo: bool,
    },
    /// Show the sample task set
    Demo {
        /// Print the JSON export instead of tables
        #[arg(short, long)]
        json: bool,
        /// Save the JSON export to the export directory
        #[arg(short, long)]
        save: bool,
        /// Search query to demonstrate
        #[arg(long, default_value = "rust")]
        search: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn init_logging() {
    if let Ok(filter) = std::env::var("TASKNEST_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let dir = cli.export_dir.unwrap_or_else(export_dir);

    match cli.command {
        Some(Commands::Demo { json, save, search }) => cmd_demo(DemoOptions {
            json,
            save_to: save.then_some(dir),
            search,
        }),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tasknest", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui { demo }) => {
            let mut manager = TaskManager::new();
            if demo {
                seed_demo(&mut manager)?;
            }
            run_tui(manager, dir)
        }
        None => run_tui(TaskManager::new(), dir),
    }
}
