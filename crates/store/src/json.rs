//! Single-file JSON snapshot store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::SnapshotStore;

/// Stores the whole snapshot as one pretty-printed JSON document.
///
/// Commits are serialized within the process. The file is replaced by
/// renaming a fully written temporary file next to it, so readers only ever
/// see a complete snapshot. Separate processes sharing a file are not
/// locked against each other beyond the revision check.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    commit_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first commit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            commit_lock: Mutex::new(()),
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Snapshot, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_atomic(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, snapshot)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl SnapshotStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Snapshot, StoreError> {
        let snapshot = self.read()?;
        debug!(
            revision = snapshot.revision,
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            goals = snapshot.goals.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    #[tracing::instrument(skip(self, batch), fields(path = %self.path.display(), changes = batch.len()))]
    fn commit(&self, expected_revision: u64, batch: WriteBatch) -> Result<Snapshot, StoreError> {
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut snapshot = self.read()?;
        if snapshot.revision != expected_revision {
            warn!(
                expected = expected_revision,
                found = snapshot.revision,
                "Rejected stale commit"
            );
            return Err(StoreError::Conflict {
                expected: expected_revision,
                found: snapshot.revision,
            });
        }

        let changes = batch.len();
        snapshot.apply(batch);
        self.write_atomic(&snapshot)?;

        info!(revision = snapshot.revision, changes, "Committed batch");
        Ok(snapshot)
    }
}
