//! TickList binary entry point.
//!
//! # Responsibility
//! - Parse CLI arguments and resolve data/log locations.
//! - Bootstrap logging and the task database.
//! - Hand a loaded store to the terminal view.

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use ticklist_core::db::open_db;
use ticklist_core::{default_log_level, init_logging, SqliteSnapshotRepository, TaskStore};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ticklist: a single-user task list for the terminal",
    long_about = None
)]
struct Cli {
    /// Override the task database location.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Override the log directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override the log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (db_path, log_dir) = resolve_paths(&cli)?;

    let level = match cli.log_level.as_deref() {
        Some(l) => l,
        None => default_log_level(),
    };
    // A broken log setup must not block the task list; the session just
    // runs without file diagnostics.
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(&db_path)
        .with_context(|| format!("cannot open task database `{}`", db_path.display()))?;
    let repo = SqliteSnapshotRepository::try_new(&conn)?;
    let store = TaskStore::load(repo);

    info!(
        "event=ui_start module=cli status=ok db={} tasks={}",
        db_path.display(),
        store.len()
    );

    app::run(store)
}

/// Resolves the database and log locations.
///
/// Explicit flags win; otherwise both default into the platform data
/// directory, which is created on first run.
fn resolve_paths(cli: &Cli) -> Result<(PathBuf, PathBuf)> {
    if let (Some(db), Some(log_dir)) = (&cli.db, &cli.log_dir) {
        return Ok((db.clone(), log_dir.clone()));
    }

    let data_dir = dirs::data_dir()
        .map(|dir| dir.join("ticklist"))
        .context("cannot resolve a platform data directory; pass --db and --log-dir explicitly")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("cannot create data directory `{}`", data_dir.display()))?;

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| data_dir.join("ticklist.db"));
    let log_dir = cli.log_dir.clone().unwrap_or_else(|| data_dir.join("logs"));
    Ok((db_path, log_dir))
}
