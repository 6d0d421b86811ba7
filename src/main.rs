//! # tb - Task Board CLI
//!
//! A kanban-style project/task manager with trigger/action automation rules.
//!
//! ## Key Features
//!
//! - **Projects & Boards**: tasks live on per-project boards with free-form
//!   status columns (conventionally "To Do" / "In Progress" / "Done")
//! - **Automation Rules**: per-project trigger/action rules that run whenever
//!   a task is created or updated - move tasks, assign users, or record
//!   notifications
//! - **User Directory**: lightweight user list for assignment, no accounts
//! - **Local File Storage**: one JSON store, loaded per command and saved
//!   atomically
//!
//! ## Quick Start
//!
//! ```bash
//! # Load the sample dataset
//! tb seed
//!
//! # See a project's board
//! tb board "Website Redesign"
//!
//! # Add a rule: assign review tasks to Jane
//! tb rule add "Review goes to Jane" --project 1 \
//!     --trigger task-moved-to-status --trigger-value Review \
//!     --action assign-to-user --action-value 2
//!
//! # Move a task; matching rules fire and are reported
//! tb move 3 Review
//! ```
//!
//! Data is stored locally in `~/.taskboard/board.json` (override with `--db`).

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod project;
pub mod rules;
pub mod seed;
pub mod task;

use cli::Cli;
use cmd::*;
use db::Database;

fn main() {
    let cli = Cli::parse();

    // Completions never touch the store.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskboard");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create taskboard directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("board.json")
    });

    let mut db = Database::load(&db_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Project { action } => cmd_project(&mut db, &db_path, action),

        Commands::User { action } => cmd_user(&mut db, &db_path, action),

        Commands::Add { title, project, desc, due, assignee, status, by } =>
            cmd_add(&mut db, &db_path, title, project, desc, due, assignee, status, by),

        Commands::List { all, project, status, assignee, due, sort, limit } =>
            cmd_list(&db, all, project, status, assignee, due, sort, limit),

        Commands::View { id } => cmd_view(&db, id),

        Commands::Update { id, title, desc, due, clear_due, assignee, clear_assignee, status } =>
            cmd_update(&mut db, &db_path, id, title, desc, due, clear_due, assignee,
                       clear_assignee, status),

        Commands::Move { id, status } => cmd_move(&mut db, &db_path, id, status),

        Commands::Assign { id, user } => cmd_assign(&mut db, &db_path, id, user),

        Commands::Delete { id } => cmd_delete(&mut db, &db_path, id),

        Commands::Board { project, all } => cmd_board(&db, project, all),

        Commands::Rule { action } => cmd_rule(&mut db, &db_path, action),

        Commands::Notifications { unread } => cmd_notifications(&db, unread),

        Commands::NotificationsRead { id, all } =>
            cmd_notifications_read(&mut db, &db_path, id, all),

        Commands::Seed { force } => seed::cmd_seed(&mut db, &db_path, force),
    }
}
