//! Store error types.

use nestegg_shared::AppError;
use thiserror::Error;

/// Errors raised while loading or committing snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be parsed or serialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Another commit landed after the caller loaded its snapshot.
    #[error("Revision conflict: expected {expected}, found {found}")]
    Conflict {
        /// Revision the caller computed against.
        expected: u64,
        /// Revision currently stored.
        found: u64,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::Conflict(err.to_string()),
            StoreError::Io(_) | StoreError::Serde(_) => Self::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_conflict() {
        let err: AppError = StoreError::Conflict {
            expected: 3,
            found: 4,
        }
        .into();
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.to_string(), "Conflict: Revision conflict: expected 3, found 4");
    }

    #[test]
    fn test_io_maps_to_storage() {
        let err: AppError = StoreError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
