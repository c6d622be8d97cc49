//! Command-line frontend for the task list core.
//!
//! # Responsibility
//! - Map subcommands onto task store operations.
//! - Render the core view-model as plain text lines.
//! - Resolve the database path and optional log directory from the
//!   environment.

use std::env;
use std::process::ExitCode;

use tasklite_core::db::open_db;
use tasklite_core::{
    core_version, default_log_level, init_logging, render, EmptyState, FilterMode,
    SqliteTaskListRepository, StoreError, TaskId, TaskListView, TaskStore,
};

const DB_PATH_ENV: &str = "TASKLITE_DB";
const LOG_DIR_ENV: &str = "TASKLITE_LOG_DIR";
const DEFAULT_DB_PATH: &str = "tasklite.db";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if let Ok(log_dir) = env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("warning: {err}");
        }
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "version" | "--version" => {
            println!("tasklite {}", core_version());
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let db_path = env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let conn = open_db(&db_path).map_err(|err| format!("cannot open `{db_path}`: {err}"))?;
    let repo = SqliteTaskListRepository::new(&conn);
    let mut store = TaskStore::open(repo);

    match command.as_str() {
        "add" => {
            let text = args[1..].join(" ");
            match store.add(&text) {
                Ok(task) => println!("added {}", task.id),
                Err(StoreError::Validation(_)) => {
                    return Err("task text is empty; nothing added".to_string());
                }
                Err(err) => return Err(err.to_string()),
            }
        }
        "list" => {
            let mode = match args.get(1) {
                Some(raw) => raw.parse::<FilterMode>().map_err(|err| err.to_string())?,
                None => FilterMode::All,
            };
            print_view(&render(store.tasks(), mode));
        }
        "toggle" => {
            let id = parse_id(args.get(1))?;
            match store.toggle(id).map_err(|err| err.to_string())? {
                Some(true) => println!("completed {id}"),
                Some(false) => println!("reopened {id}"),
                None => println!("no task with id {id}"),
            }
        }
        "delete" => {
            let id = parse_id(args.get(1))?;
            if store.delete(id).map_err(|err| err.to_string())? {
                println!("deleted {id}");
            } else {
                println!("no task with id {id}");
            }
        }
        "clear-completed" => {
            let removed = store.clear_completed().map_err(|err| err.to_string())?;
            println!("removed {removed} completed task(s)");
        }
        "stats" => {
            let stats = store.stats();
            println!(
                "total={} completed={} pending={}",
                stats.total, stats.completed, stats.pending
            );
        }
        other => return Err(format!("unknown command `{other}`; run `tasklite help`")),
    }

    Ok(())
}

fn parse_id(raw: Option<&String>) -> Result<TaskId, String> {
    let raw = raw.ok_or_else(|| "missing task id".to_string())?;
    raw.parse::<TaskId>()
        .map_err(|_| format!("invalid task id `{raw}`"))
}

fn print_view(view: &TaskListView) {
    match view.empty {
        Some(EmptyState::NoTasks) => println!("no tasks yet"),
        Some(EmptyState::NoMatches(mode)) => println!("no {} tasks", mode.as_str()),
        None => {
            for row in &view.rows {
                let mark = if row.completed { "x" } else { " " };
                println!("[{mark}] {}  {}", row.id, row.text);
            }
        }
    }

    let stats = view.stats;
    println!(
        "-- total={} completed={} pending={}",
        stats.total, stats.completed, stats.pending
    );
    if view.show_clear_completed {
        println!("-- `tasklite clear-completed` removes the completed ones");
    }
}

fn print_usage() {
    println!("tasklite {}", core_version());
    println!();
    println!("usage: tasklite <command> [args]");
    println!();
    println!("commands:");
    println!("  add <text>...              create a task");
    println!("  list [all|pending|completed]");
    println!("  toggle <id>                flip completion of one task");
    println!("  delete <id>                remove one task");
    println!("  clear-completed            remove every completed task");
    println!("  stats                      print running counts");
    println!("  version                    print the core version");
    println!();
    println!("environment:");
    println!("  {DB_PATH_ENV}     database path (default {DEFAULT_DB_PATH})");
    println!("  {LOG_DIR_ENV}  absolute directory for rolling logs (optional)");
}
