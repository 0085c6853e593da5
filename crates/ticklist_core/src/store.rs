//! Task store owning the authoritative in-memory sequence.
//!
//! # Responsibility
//! - Apply add/toggle/delete mutations to the task sequence.
//! - Re-persist the full snapshot after every mutation that changes it.
//! - Degrade storage failures per policy: corrupt snapshots load as an
//!   empty sequence, failed writes keep the in-memory state authoritative.
//!
//! # Invariants
//! - New tasks are prepended; the sequence stays most-recent-first.
//! - Mutations on unknown ids are no-ops, never errors.
//! - Blank input (empty after trimming) never creates a record.

use crate::model::task::{Task, TaskId};
use crate::repo::snapshot_repo::SnapshotRepository;
use log::{info, warn};

/// Authoritative task sequence plus its persistence side-effect.
///
/// The store is the only writer of the snapshot; callers render from
/// `tasks()` and derive the footer from `remaining_count()` after every
/// mutation.
pub struct TaskStore<R: SnapshotRepository> {
    repo: R,
    tasks: Vec<Task>,
}

impl<R: SnapshotRepository> TaskStore<R> {
    /// Loads the persisted sequence, recovering to empty on any decode
    /// failure.
    ///
    /// Corrupt or foreign snapshot data must never reach the user as an
    /// error; the recovery is recorded as a diagnostic event only.
    pub fn load(repo: R) -> Self {
        let tasks = match repo.load_tasks() {
            Ok(tasks) => {
                info!(
                    "event=snapshot_load module=store status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!("event=snapshot_load module=store status=recovered error={err}");
                Vec::new()
            }
        };

        Self { repo, tasks }
    }

    /// Current sequence in display order, most recent first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the sequence.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a task from raw composer input.
    ///
    /// # Contract
    /// - Input is trimmed; blank input is a no-op returning `None`.
    /// - The new record gets a fresh id, `done = false`, and index 0.
    /// - Returns the new task's id so the UI can move selection to it.
    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }

        let task = Task::new(text);
        let id = task.id.clone();
        self.tasks.insert(0, task);
        info!(
            "event=task_add module=store status=ok id={id} count={}",
            self.tasks.len()
        );
        self.persist();
        Some(id)
    }

    /// Flips `done` on the matching task.
    ///
    /// Returns whether a task matched; unknown ids are a no-op so stale
    /// references from the UI cannot fail.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == *id) else {
            return false;
        };

        task.toggle();
        info!(
            "event=task_toggle module=store status=ok id={id} done={}",
            task.done
        );
        self.persist();
        true
    }

    /// Removes the matching task, preserving the order of the rest.
    ///
    /// Returns whether a task matched; unknown ids are a no-op.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == *id) else {
            return false;
        };

        self.tasks.remove(index);
        info!(
            "event=task_delete module=store status=ok id={id} count={}",
            self.tasks.len()
        );
        self.persist();
        true
    }

    /// Number of tasks not yet done.
    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.done).count()
    }

    /// Footer wording for the remaining count.
    ///
    /// "1 task remaining", otherwise "N tasks remaining" (including zero).
    pub fn remaining_label(&self) -> String {
        let remaining = self.remaining_count();
        let noun = if remaining == 1 { "task" } else { "tasks" };
        format!("{remaining} {noun} remaining")
    }

    /// Writes the full snapshot; failures degrade to in-memory state.
    ///
    /// Persistence failure has no user-visible surface: the session keeps
    /// running on the in-memory sequence and the failure is logged.
    fn persist(&self) {
        if let Err(err) = self.repo.save_tasks(&self.tasks) {
            warn!("event=snapshot_save module=store status=error error={err}");
        }
    }
}
