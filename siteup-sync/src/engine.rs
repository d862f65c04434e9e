//! Sync orchestration: walk, fingerprint, diff, upload.
//!
//! The manifest is loaded and frozen before any worker starts; trusting a
//! partial manifest would re-upload objects the bucket already holds. Files
//! are then fingerprinted and uploaded under a bounded number of in-flight
//! tasks. A manifest failure aborts the run; any per-file failure is
//! isolated and collected into the report.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::content_type;
use crate::error::{SyncError, SyncResult};
use crate::etag;
use crate::manifest::Manifest;
use crate::plan::{self, Action};
use crate::store::ObjectStore;
use crate::types::{SyncFailure, SyncReport, SyncTask};
use crate::walker::{self, LocalFile};

/// Files fingerprinted/uploaded at once unless overridden.
const DEFAULT_WORKERS: usize = 8;

/// Whether one file ended up on the wire or not.
enum Outcome {
    Uploaded,
    Skipped,
}

/// Drives one-way sync runs from a local tree to an object store.
pub struct SyncEngine {
    store: Arc<dyn ObjectStore>,
    workers: usize,
    cancel: CancellationToken,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            workers: DEFAULT_WORKERS,
            cancel: CancellationToken::new(),
        }
    }

    /// Overrides the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Token observed between files. Cancelling it stops admitting new
    /// files; in-flight uploads settle before the partial report returns.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Syncs `root` into the store.
    ///
    /// Returns what was uploaded, skipped, and failed; every discovered
    /// file appears in exactly one of the three sets.
    pub async fn sync(&self, root: &Path) -> SyncResult<SyncReport> {
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let manifest = Arc::new(Manifest::load(self.store.as_ref()).await?);
        info!("manifest holds {} remote objects", manifest.len());

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut join = JoinSet::new();
        let mut report = SyncReport::default();

        for item in walker::walk(root)? {
            let file = match item {
                Ok(file) => file,
                Err(SyncError::UnreadableFile { path, cause }) => {
                    warn!("unreadable {path}: {cause}");
                    report.failed.push(SyncFailure { key: path, cause });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let permit = tokio::select! {
                _ = self.cancel.cancelled() => break,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let store = Arc::clone(&self.store);
            let manifest = Arc::clone(&manifest);
            join.spawn(async move {
                let _permit = permit;
                let key = file.key.clone();
                let outcome = sync_one(store.as_ref(), &manifest, file).await;
                (key, outcome)
            });
        }

        while let Some(joined) = join.join_next().await {
            match joined {
                Ok((key, Ok(Outcome::Uploaded))) => report.uploaded.push(key),
                Ok((key, Ok(Outcome::Skipped))) => report.skipped.push(key),
                Ok((key, Err(err))) => {
                    warn!("{key}: {err}");
                    report.failed.push(SyncFailure {
                        key,
                        cause: err.to_string(),
                    });
                }
                Err(join_err) => error!("sync worker panicked: {join_err}"),
            }
        }

        if self.cancel.is_cancelled() {
            warn!("sync cancelled; returning partial report");
        }

        report.uploaded.sort();
        report.skipped.sort();
        report.failed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(report)
    }
}

/// Fingerprints one file, consults the manifest, uploads when needed.
async fn sync_one(
    store: &dyn ObjectStore,
    manifest: &Manifest,
    file: LocalFile,
) -> SyncResult<Outcome> {
    let LocalFile { path, key } = file;

    let fingerprint_path = path.clone();
    let etag = tokio::task::spawn_blocking(move || etag::etag_for_path(&fingerprint_path))
        .await
        .map_err(|join| SyncError::UnreadableFile {
            path: path.display().to_string(),
            cause: join.to_string(),
        })?
        .map_err(|io| SyncError::UnreadableFile {
            path: path.display().to_string(),
            cause: io.to_string(),
        })?;

    let task = SyncTask { path, key, etag };
    match plan::decide(manifest, &task.key, task.etag.as_deref()) {
        Action::Skip => {
            debug!("skip {} (etag match)", task.key);
            Ok(Outcome::Skipped)
        }
        Action::Upload => {
            let content_type = content_type::for_key(&task.key);
            store.put_file(&task.key, &task.path, content_type).await?;
            debug!("uploaded {} as {content_type}", task.key);
            Ok(Outcome::Uploaded)
        }
    }
}
