//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot data-access contract.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Task::validate()` before persistence.
//! - Repository reads return semantic errors for invalid persisted state
//!   instead of masking it; degradation policy lives in the store layer.

pub mod snapshot_repo;
