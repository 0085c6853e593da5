//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the snapshot.
//! - Provide validation for the record-level invariants.
//!
//! # Invariants
//! - `id` is stable, opaque and never reused for another task.
//! - `text` is non-empty after trimming; trimming happens before a record
//!   is created, never on load.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable opaque identifier for one task.
///
/// Kept as an owned string rather than a `Uuid`: the persisted snapshot
/// treats ids as opaque text, and snapshots written by earlier sessions may
/// carry ids that are not UUID-shaped. Fresh ids are UUID v4 rendered to
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id value, e.g. one read back from storage.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the id carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The id string is empty.
    EmptyId,
    /// The text is empty or whitespace-only.
    BlankText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::BlankText => write!(f, "task text cannot be empty or whitespace-only"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Wire shape in the snapshot is exactly `{"id", "text", "done"}`; field
/// order here matches the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable opaque id used for toggle/delete matching.
    pub id: TaskId,
    /// Display text. Immutable after creation.
    pub text: String,
    /// Completion flag. The only mutable field.
    pub done: bool,
}

impl Task {
    /// Creates a new open task with a generated id.
    ///
    /// Callers are expected to hand in already-trimmed text; the composer
    /// owns trimming and blank rejection.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            done: false,
        }
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used by decode paths where identity already exists in storage.
    pub fn with_id(id: TaskId, text: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            text: text.into(),
            done,
        }
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when the id string is empty.
    /// - `BlankText` when the text trims to nothing.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::BlankText);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}
