mod support;

use pretty_assertions::assert_eq;
use siteup_sync::error::SyncError;
use siteup_sync::manifest::Manifest;
use support::MemoryStore;

#[tokio::test]
async fn aggregates_every_page_before_returning() {
    let store = MemoryStore::new(1000);
    for i in 0..3000 {
        store.insert(&format!("assets/{i:05}.png"), &format!("\"etag-{i}\""));
    }

    let manifest = Manifest::load(&store).await.unwrap();

    assert_eq!(manifest.len(), 3000);
    assert_eq!(store.list_calls(), 3);
    assert_eq!(manifest.etag("assets/02999.png"), Some("\"etag-2999\""));
}

#[tokio::test]
async fn short_listing_fits_one_page() {
    let store = MemoryStore::new(1000);
    store.insert("index.html", "\"aa\"");
    store.insert("error.html", "\"bb\"");

    let manifest = Manifest::load(&store).await.unwrap();

    assert_eq!(manifest.len(), 2);
    assert_eq!(store.list_calls(), 1);
    assert_eq!(manifest.etag("index.html"), Some("\"aa\""));
    assert_eq!(manifest.etag("missing.html"), None);
}

#[tokio::test]
async fn empty_bucket_loads_empty_manifest() {
    let store = MemoryStore::new(1000);
    let manifest = Manifest::load(&store).await.unwrap();
    assert!(manifest.is_empty());
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let store = MemoryStore::new(1000);
    store.fail_listing();

    let err = Manifest::load(&store).await.unwrap_err();
    assert!(matches!(err, SyncError::RemoteList(_)));
    assert!(err.is_fatal());
}
