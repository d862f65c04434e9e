use pretty_assertions::assert_eq;
use siteup_aws::endpoints::{StaticCatalog, lookup, website_url};
use siteup_sync::store::EndpointCatalog;

#[test]
fn known_region_resolves() {
    let endpoint = lookup("us-east-1").unwrap();
    assert_eq!(endpoint.host, "s3-website-us-east-1.amazonaws.com");
    assert_eq!(endpoint.zone_id, "Z3AQBSTGFYJSTF");
}

#[test]
fn unknown_region_resolves_to_none() {
    assert!(lookup("mars-north-1").is_none());
}

#[test]
fn website_url_prefixes_the_bucket() {
    assert_eq!(
        website_url("my-site.example.com", "eu-west-1").as_deref(),
        Some("http://my-site.example.com.s3-website-eu-west-1.amazonaws.com")
    );
    assert!(website_url("bucket", "mars-north-1").is_none());
}

#[test]
fn catalog_trait_matches_free_function() {
    let catalog = StaticCatalog;
    assert_eq!(catalog.lookup("ap-south-1"), lookup("ap-south-1"));
    assert_eq!(catalog.lookup("nowhere"), None);
}
