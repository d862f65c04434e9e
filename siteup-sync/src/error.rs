//! Sync error types.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while syncing a tree to the store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local filesystem access failed before any per-file work started
    /// (e.g. the sync root is missing or unreadable).
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bucket listing could not be completed. Fatal: without the full
    /// manifest no diff decision can be trusted.
    #[error("bucket listing failed: {0}")]
    RemoteList(String),

    /// One upload failed. The run continues with the remaining files.
    #[error("upload failed for {key}: {cause}")]
    Upload { key: String, cause: String },

    /// A file or directory entry could not be read during traversal or
    /// fingerprinting. The entry lands in the report's failed set.
    #[error("unreadable {path}: {cause}")]
    UnreadableFile { path: String, cause: String },

    /// The run was cancelled before it could start.
    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// True when the whole run must stop instead of continuing per-file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::RemoteList(_) | SyncError::Cancelled)
    }
}
