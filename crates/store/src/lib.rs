//! Persistence for Nestegg records.
//!
//! This crate provides:
//! - `Snapshot`, the full set of transactions, budgets and goals at a revision
//! - `WriteBatch`, the changes committed together as one unit
//! - `SnapshotStore`, the load/commit abstraction with optimistic concurrency
//! - `JsonFileStore`, a single-file JSON implementation

pub mod batch;
pub mod error;
pub mod json;
pub mod snapshot;

pub use batch::WriteBatch;
pub use error::StoreError;
pub use json::JsonFileStore;
pub use snapshot::Snapshot;

/// Revisioned snapshot storage.
///
/// A commit names the revision it was computed against. If another commit
/// landed in between, the store refuses it so the caller can reload and
/// recompute instead of overwriting.
pub trait SnapshotStore {
    /// Loads the current snapshot.
    fn load(&self) -> Result<Snapshot, StoreError>;

    /// Applies `batch` on top of `expected_revision` and returns the new snapshot.
    ///
    /// Either every change in the batch is stored or none is.
    fn commit(&self, expected_revision: u64, batch: WriteBatch) -> Result<Snapshot, StoreError>;
}
