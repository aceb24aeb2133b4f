//! CLI argument parsing for tasklist.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist::DEFAULT_MAX_LENGTH;

#[derive(Parser)]
#[command(
    name = "tl",
    about = "A small persistent task list",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/tasklist/logs/tasklist.log"
)]
pub struct Cli {
    /// Path to the task database (default: ~/.local/share/tasklist/tasks.db)
    #[arg(short = 'd', long, global = true)]
    pub db: Option<PathBuf>,

    /// Maximum task length in characters; longer input is truncated
    #[arg(short, long, global = true, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task (duplicates are allowed)
    Add {
        /// Task text
        text: String,
    },

    /// Mark the oldest matching pending task as completed
    Complete {
        /// Task text
        text: String,
    },

    /// Remove the oldest matching pending task (kept as soft-deleted)
    Remove {
        /// Task text
        text: String,
    },

    /// Permanently delete the oldest matching pending task
    Delete {
        /// Task text
        text: String,
    },

    /// Soft-delete every visible task
    Clear {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Permanently delete every task, including soft-deleted ones
    Purge {
        /// Confirm the purge
        #[arg(short, long)]
        yes: bool,

        /// Compact the database file afterwards
        #[arg(short, long)]
        compact: bool,
    },

    /// List pending tasks
    Pending,

    /// List completed tasks
    Completed,

    /// List all tasks with their creation time
    List {
        /// Include soft-deleted tasks
        #[arg(long)]
        deleted: bool,

        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search visible tasks by keyword
    Search {
        /// Keyword or pattern
        keyword: String,

        /// Case-sensitive GLOB matching (*, ?, [a-z]) instead of LIKE (%, _)
        #[arg(short = 's', long)]
        case_sensitive: bool,

        /// Use the keyword as the whole pattern instead of a substring
        #[arg(short, long)]
        exact: bool,
    },

    /// Show task counts
    Stats,
}
