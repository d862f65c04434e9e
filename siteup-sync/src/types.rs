//! Types flowing through one sync run.

use std::path::PathBuf;

use serde::Serialize;

/// A file queued for diffing: where it lives locally, the bucket key it
/// maps to, and its computed etag (`None` for empty files).
#[derive(Clone, Debug)]
pub struct SyncTask {
    pub path: PathBuf,
    pub key: String,
    pub etag: Option<String>,
}

/// One file that could not be synced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub key: String,
    pub cause: String,
}

/// Outcome of a sync run.
///
/// Every discovered file lands in exactly one of the three sets; nothing is
/// silently dropped. Vectors are sorted by key for reproducible output.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<SyncFailure>,
}

impl SyncReport {
    /// Total number of files the run accounted for.
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.skipped.len() + self.failed.len()
    }

    /// True when no file failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
