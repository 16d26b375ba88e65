//! Command-line front end for the to-do core.
//!
//! # Responsibility
//! - Exercise the core stores and flag source without any UI.
//! - Keep output line-oriented and deterministic for local sanity checks.
//!
//! Without `--db` the data lives in an in-memory SQLite database and is
//! gone when the process exits.

use clap::{Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tidytodo_core::db::{open_db, open_db_in_memory};
use tidytodo_core::{
    core_version, init_logging, ping, AppConfig, CreateTodoDto, FilterType, FlagName,
    HttpRemoteConfigProvider, SqliteKeyValueStore, Todo, TodoApp,
};

#[derive(Parser, Debug)]
#[command(
    name = "tidytodo_cli",
    version,
    about = "Command-line front end for the TidyTodo core",
    arg_required_else_help = true
)]
struct Cli {
    /// SQLite database file (default: in-memory).
    #[arg(long = "db", global = true, value_name = "PATH")]
    db_path: Option<PathBuf>,

    /// JSON config file; a missing file means defaults.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Health check against the core crate.
    Ping,
    /// Print the core crate version.
    Version,
    /// List todos, optionally narrowed by status and search term.
    List {
        #[arg(default_value = "all", value_name = "all|pending|completed")]
        filter: FilterType,
        search: Option<String>,
    },
    /// Create a todo; words are joined with spaces.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Flip a todo between pending and completed.
    Toggle { id: String },
    /// Remove a todo.
    Rm { id: String },
    /// Remove every completed todo.
    ClearCompleted,
    /// Print total/completed/pending counts.
    Stats,
    /// List categories.
    Categories,
    /// Print the active feature flags.
    Flags,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Ping => {
            println!("tidytodo_core ping={}", ping());
            return Ok(());
        }
        Command::Version => {
            println!("tidytodo_core version={}", core_version());
            return Ok(());
        }
        _ => {}
    }

    let config = match &cli.config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = cli.log_dir.as_ref().or(config.logging.dir.as_ref()) {
        init_logging(&config.logging.level, dir)?;
    }

    let conn = match &cli.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let provider = HttpRemoteConfigProvider::new(config.remote_config.clone())?;
    let mut app = TodoApp::open(SqliteKeyValueStore::new(&conn), provider, config)?;

    match cli.command {
        Command::Ping | Command::Version => {}
        Command::List { filter, search } => {
            let search = search.unwrap_or_default();
            print_todos(&app.visible_todos(&search, filter, None));
        }
        Command::Add { title } => {
            let todo = app.create_todo(CreateTodoDto::titled(title.join(" ")))?;
            print_todo(&todo);
        }
        Command::Toggle { id } => print_todo(&app.toggle_todo(&id)?),
        Command::Rm { id } => {
            app.remove_todo(&id)?;
            println!("removed {id}");
        }
        Command::ClearCompleted => {
            let before = app.stats().completed;
            app.clear_completed()?;
            println!("cleared {before}");
        }
        Command::Stats => {
            let stats = app.stats();
            println!(
                "total={} completed={} pending={}",
                stats.total, stats.completed, stats.pending
            );
        }
        Command::Categories => {
            for category in app.categories().snapshot() {
                println!("{}\t{}\t{}", category.id, category.color, category.name);
            }
        }
        Command::Flags => {
            for name in FlagName::ALL {
                println!("{}={}", name.key(), app.flags().flag(name));
            }
        }
    }
    Ok(())
}

fn print_todos(todos: &[Todo]) {
    for todo in todos {
        print_todo(todo);
    }
}

fn print_todo(todo: &Todo) {
    let mark = if todo.completed { "x" } else { " " };
    println!("[{mark}] {}\t{}", todo.id, todo.title);
}
