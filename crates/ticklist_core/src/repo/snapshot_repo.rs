//! Snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the entire task sequence as one JSON value under a fixed key.
//! - Keep SQL and serialization details inside the persistence boundary.
//!
//! # Invariants
//! - Writes are full-snapshot overwrites, never incremental diffs.
//! - Write paths must call `Task::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Task, TaskValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key addressing the one persisted task sequence.
///
/// Part of the format contract: the value under this key is a JSON array of
/// `{"id", "text", "done"}` records in display order, most recent first.
pub const SNAPSHOT_KEY: &str = "ticklist_tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from snapshot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// A record violates model invariants.
    Validation(TaskValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be decoded into a valid task sequence.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "snapshot repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "snapshot repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted snapshot: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the persisted task sequence.
pub trait SnapshotRepository {
    /// Loads the full task sequence, or an empty one when no snapshot exists.
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Overwrites the persisted snapshot with the given sequence.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Creates a repository after verifying the connection is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!(
                "value under `{SNAPSHOT_KEY}` is not a task array: {err}"
            ))
        })?;

        let mut seen = HashSet::new();
        for task in &tasks {
            task.validate()?;
            if !seen.insert(task.id.as_str()) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate task id `{}` under `{SNAPSHOT_KEY}`",
                    task.id
                )));
            }
        }

        Ok(tasks)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let payload = serde_json::to_string(tasks)
            .map_err(|err| RepoError::InvalidData(format!("snapshot not serializable: {err}")))?;

        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![SNAPSHOT_KEY, payload],
        )?;

        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "kv_store")? {
        return Err(RepoError::MissingRequiredTable("kv_store"));
    }

    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "kv_store", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_store",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
