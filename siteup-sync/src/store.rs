//! Interfaces to the remote side.
//!
//! The engine reaches the bucket only through [`ObjectStore`], so tests
//! substitute an in-memory store for the AWS adapter. The endpoint catalog
//! is consulted only for reporting the public URL; it never participates in
//! the sync algorithm.

use std::path::Path;

use async_trait::async_trait;

use crate::error::SyncResult;

/// Key and stored etag of one remote object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub etag: String,
}

/// One page of a bucket listing.
#[derive(Clone, Debug, Default)]
pub struct ObjectPage {
    pub objects: Vec<RemoteObject>,
    /// Opaque token for the next page; `None` on the last page.
    pub next_token: Option<String>,
}

/// Minimal capability set the sync engine needs from a bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches one page of the bucket listing. Pass the token from the
    /// previous page to continue; `None` starts from the beginning.
    async fn list_page(&self, token: Option<String>) -> SyncResult<ObjectPage>;

    /// Uploads the file at `path` under `key` with the given content type.
    ///
    /// Implementations must switch to multipart transfer with parts of
    /// [`crate::etag::CHUNK_SIZE`] bytes once the file exceeds one chunk,
    /// so the etag the store records equals the one computed locally.
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> SyncResult<()>;
}

/// Website endpoint for one region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebsiteEndpoint {
    /// Hostname serving website requests for buckets in the region.
    pub host: String,
    /// Hosted zone id owning that hostname, used as the alias target zone.
    pub zone_id: String,
}

/// Region identifier to website endpoint lookup.
pub trait EndpointCatalog: Send + Sync {
    fn lookup(&self, region: &str) -> Option<WebsiteEndpoint>;
}
