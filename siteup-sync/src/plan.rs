//! Upload planning: skip what the bucket already holds.

use crate::manifest::Manifest;

/// What to do with one local file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Remote etag equals the local one; nothing to transfer.
    Skip,
    /// New key, changed content, or no comparable local etag.
    Upload,
}

/// Decides skip vs upload for `key` given its freshly computed etag.
///
/// The comparison is an exact string match against the manifest entry.
/// `etag` is `None` for empty files, which always upload: a fingerprint we
/// did not compute can never match a stored one.
pub fn decide(manifest: &Manifest, key: &str, etag: Option<&str>) -> Action {
    match etag {
        Some(local) if manifest.etag(key) == Some(local) => Action::Skip,
        _ => Action::Upload,
    }
}
