//! Lazy recursive traversal of the sync root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{SyncError, SyncResult};

/// A regular file discovered under the sync root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Bucket key: the path relative to the root, `/`-separated on every
    /// platform.
    pub key: String,
}

/// Lazy iterator over the regular files beneath a root.
///
/// Entries are visited in file-name order so repeated runs over the same
/// tree see the same sequence. Unreadable children surface as soft
/// [`SyncError::UnreadableFile`] items instead of ending the traversal.
#[derive(Debug)]
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

/// Starts a walk at `root`. A missing or unreadable root fails up front.
pub fn walk(root: &Path) -> SyncResult<Walk> {
    let root = root.canonicalize().map_err(|source| SyncError::Io {
        path: root.display().to_string(),
        source,
    })?;
    let inner = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    Ok(Walk { root, inner })
}

impl Iterator for Walk {
    type Item = SyncResult<LocalFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    return Some(Err(SyncError::UnreadableFile {
                        path,
                        cause: err.to_string(),
                    }));
                }
            };

            // Directories drive recursion; anything that is not a plain
            // file (symlinks, sockets, ...) is skipped.
            if !entry.file_type().is_file() {
                continue;
            }

            match relative_key(&self.root, entry.path()) {
                Some(key) => {
                    return Some(Ok(LocalFile {
                        path: entry.into_path(),
                        key,
                    }));
                }
                None => continue,
            }
        }
    }
}

/// Joins the components below `root` with forward slashes.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
