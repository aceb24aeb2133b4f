//! tasklist CLI - a small persistent task list.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tasklist::{Outcome, Store, StoreConfig, StoreQueryExt};

mod cli;

use cli::{Cli, Command};

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
}

fn setup_logging() -> Result<()> {
    let log_dir = data_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasklist.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_db_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.db {
        Some(path) => Ok(path.clone()),
        None => {
            let dir = data_dir();
            fs::create_dir_all(&dir).context("Failed to create data directory")?;
            Ok(dir.join("tasks.db"))
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    if outcome.is_applied() {
        println!("{} {}", "✓".green(), outcome);
    } else {
        println!("{} {}", "-".yellow(), outcome.to_string().dimmed());
    }
}

fn print_texts(heading: &str, texts: &[String]) {
    if texts.is_empty() {
        println!("{}", format!("No {} tasks", heading).dimmed());
        return;
    }
    println!("{} {} {} task(s):", "→".blue(), texts.len(), heading);
    for text in texts {
        println!("  - {}", text);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (yes/no): ", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

fn run(cli: Cli) -> Result<()> {
    let db_path = get_db_path(&cli)?;
    let config = StoreConfig::new(&db_path).max_length(cli.max_length);
    let mut store = Store::open_with(config).context("Failed to open store")?;

    match cli.command {
        Command::Add { text } => print_outcome(&store.add(&text).context("Failed to add task")?),

        Command::Complete { text } => print_outcome(&store.complete(&text).context("Failed to complete task")?),

        Command::Remove { text } => print_outcome(&store.remove(&text).context("Failed to remove task")?),

        Command::Delete { text } => print_outcome(&store.delete(&text).context("Failed to delete task")?),

        Command::Clear { yes } => {
            if yes || confirm("Are you sure you want to clear all tasks?")? {
                let count = store.clear().context("Failed to clear tasks")?;
                println!("{} Cleared {} task(s)", "✓".green(), count);
            } else {
                println!("{}", "Cancelled.".dimmed());
            }
        }

        Command::Purge { yes, compact } => {
            let confirmed = yes || confirm("Permanently delete every task, including removed ones?")?;
            let count = store.purge(confirmed, compact).context("Failed to purge tasks")?;
            if confirmed {
                println!("{} Purged {} task(s)", "✓".green(), count);
            } else {
                println!("{}", "Cancelled.".dimmed());
            }
        }

        Command::Pending => {
            let texts = store.list_pending().context("Failed to list pending tasks")?;
            print_texts("pending", &texts);
        }

        Command::Completed => {
            let texts = store.list_completed().context("Failed to list completed tasks")?;
            print_texts("completed", &texts);
        }

        Command::List { deleted, json } => {
            if json {
                let tasks = store.tasks(deleted).context("Failed to list tasks")?;
                println!("{}", serde_json::to_string_pretty(&tasks).context("Failed to serialize tasks")?);
            } else {
                let rows = store.list_all(deleted).context("Failed to list tasks")?;
                if rows.is_empty() {
                    println!("{}", "No tasks found".dimmed());
                }
                for (text, created_at) in rows {
                    println!("{} {}", created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(), text);
                }
            }
        }

        Command::Search {
            keyword,
            case_sensitive,
            exact,
        } => {
            let hits = store
                .search(keyword)
                .case_sensitive(case_sensitive)
                .surround_wildcards(!exact)
                .execute()
                .context("Failed to search tasks")?;
            print_texts("matching", &hits);
        }

        Command::Stats => {
            let counts = store.counts().context("Failed to count tasks")?;
            println!("{}: {}", "Pending".bold(), counts.pending.to_string().green());
            println!("{}: {}", "Completed".bold(), counts.completed.to_string().blue());
            println!("{}: {}", "Removed".bold(), counts.deleted.to_string().dimmed());
        }
    }

    store.close().context("Failed to close store")?;
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
