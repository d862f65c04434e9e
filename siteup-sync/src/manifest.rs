//! Remote manifest: every stored key's etag, loaded once per run.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SyncResult;
use crate::store::ObjectStore;

/// Snapshot of the bucket's keys and etags.
///
/// Must be fully aggregated before the first diff decision: a partially
/// loaded manifest misreports existing objects as new and re-uploads them.
/// Held only for the duration of one sync run, never persisted.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    /// Pages through the whole bucket listing and indexes it.
    pub async fn load(store: &dyn ObjectStore) -> SyncResult<Self> {
        let mut entries = HashMap::new();
        let mut token = None;

        loop {
            let page = store.list_page(token).await?;
            for object in page.objects {
                entries.insert(object.key, object.etag);
            }
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }

        debug!("manifest loaded with {} objects", entries.len());
        Ok(Self { entries })
    }

    /// The stored etag for `key`, if the bucket holds it.
    pub fn etag(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
