use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Kanban-style project/task manager with automation rules.
/// Storage defaults to ~/.taskboard/board.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tb", version, about = "Project/task board CLI with automation rules")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
