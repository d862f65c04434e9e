//! Shared test helpers: an in-memory object store standing in for S3.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use siteup_sync::error::{SyncError, SyncResult};
use siteup_sync::etag::etag_from_reader;
use siteup_sync::store::{ObjectPage, ObjectStore, RemoteObject};

/// Etag S3 records for a zero-byte object.
pub const EMPTY_ETAG: &str = "\"d41d8cd98f00b204e9800998ecf8427e\"";

/// One stored object as the fake bucket sees it.
#[derive(Clone, Debug)]
pub struct StoredObject {
    pub etag: String,
    pub content_type: String,
}

/// In-memory [`ObjectStore`] that computes real S3-style etags on put and
/// serves its listing in pages, so pagination and diffing behave exactly
/// as they would against the real bucket.
pub struct MemoryStore {
    page_size: usize,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    puts: usize,
    list_calls: usize,
    fail_puts_for: Vec<String>,
    fail_listing: bool,
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            state: Mutex::new(State::default()),
        }
    }

    /// Seeds a remote object without counting it as an upload.
    pub fn insert(&self, key: &str, etag: &str) {
        self.state.lock().unwrap().objects.insert(
            key.to_string(),
            StoredObject {
                etag: etag.to_string(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Makes every `put_file` for `key` fail.
    pub fn fail_put(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_puts_for
            .push(key.to_string());
    }

    /// Makes every listing call fail.
    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    pub fn puts(&self) -> usize {
        self.state.lock().unwrap().puts
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(&self, token: Option<String>) -> SyncResult<ObjectPage> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_listing {
            return Err(SyncError::RemoteList("injected listing failure".into()));
        }

        let offset: usize = token.as_deref().map_or(0, |t| t.parse().unwrap());
        let objects: Vec<RemoteObject> = state
            .objects
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|(key, object)| RemoteObject {
                key: key.clone(),
                etag: object.etag.clone(),
            })
            .collect();

        let consumed = offset + objects.len();
        let next_token = (consumed < state.objects.len()).then(|| consumed.to_string());
        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> SyncResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_puts_for.iter().any(|k| k == key) {
            return Err(SyncError::Upload {
                key: key.to_string(),
                cause: "injected upload failure".into(),
            });
        }

        let bytes = std::fs::read(path).map_err(|e| SyncError::Upload {
            key: key.to_string(),
            cause: e.to_string(),
        })?;
        let etag = etag_from_reader(&bytes[..])
            .expect("in-memory read cannot fail")
            .unwrap_or_else(|| EMPTY_ETAG.to_string());

        state.puts += 1;
        state.objects.insert(
            key.to_string(),
            StoredObject {
                etag,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
