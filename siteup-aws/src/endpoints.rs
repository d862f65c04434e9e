//! Region to S3 website endpoint catalog.
//!
//! Alias records must target the hosted zone that owns the website
//! endpoint, not the caller's own zone, so each entry carries both the
//! hostname and that zone's id. The set is a fixed AWS constant; regions
//! without website hosting simply have no entry.

use siteup_sync::store::{EndpointCatalog, WebsiteEndpoint};

/// (region, website hostname, hosted zone id)
const WEBSITE_ENDPOINTS: &[(&str, &str, &str)] = &[
    ("us-east-1", "s3-website-us-east-1.amazonaws.com", "Z3AQBSTGFYJSTF"),
    ("us-east-2", "s3-website.us-east-2.amazonaws.com", "Z2O1EMRO9K5GLX"),
    ("us-west-1", "s3-website-us-west-1.amazonaws.com", "Z2F56UZL2M1ACD"),
    ("us-west-2", "s3-website-us-west-2.amazonaws.com", "Z3BJ6K6RIION7M"),
    ("ca-central-1", "s3-website.ca-central-1.amazonaws.com", "Z1QDHH18159H29"),
    ("eu-west-1", "s3-website-eu-west-1.amazonaws.com", "Z1BKCTXD74EZPE"),
    ("eu-west-2", "s3-website.eu-west-2.amazonaws.com", "Z3GKZC51ZF0DB4"),
    ("eu-west-3", "s3-website.eu-west-3.amazonaws.com", "Z3R1K369G5AVDG"),
    ("eu-central-1", "s3-website.eu-central-1.amazonaws.com", "Z21DNDUVLTQW6Q"),
    ("eu-north-1", "s3-website.eu-north-1.amazonaws.com", "Z3BAZG2TWCNX0D"),
    ("ap-south-1", "s3-website.ap-south-1.amazonaws.com", "Z11RGJOFQNVJUP"),
    ("ap-northeast-1", "s3-website-ap-northeast-1.amazonaws.com", "Z2M4EHUR26P7ZW"),
    ("ap-northeast-2", "s3-website.ap-northeast-2.amazonaws.com", "Z3W03O7B5YMIYP"),
    ("ap-northeast-3", "s3-website.ap-northeast-3.amazonaws.com", "Z2YQB5RD63NC85"),
    ("ap-southeast-1", "s3-website-ap-southeast-1.amazonaws.com", "Z3O0J2DXBE1FTB"),
    ("ap-southeast-2", "s3-website-ap-southeast-2.amazonaws.com", "Z1WCIGYICN2BYD"),
    ("sa-east-1", "s3-website-sa-east-1.amazonaws.com", "Z7KQH4QJS55SO"),
];

/// Looks up the website endpoint for a region identifier.
pub fn lookup(region: &str) -> Option<WebsiteEndpoint> {
    WEBSITE_ENDPOINTS
        .iter()
        .find(|(r, _, _)| *r == region)
        .map(|(_, host, zone_id)| WebsiteEndpoint {
            host: host.to_string(),
            zone_id: zone_id.to_string(),
        })
}

/// The public website URL for a bucket in a region, when the region hosts
/// websites at all.
pub fn website_url(bucket: &str, region: &str) -> Option<String> {
    lookup(region).map(|endpoint| format!("http://{bucket}.{}", endpoint.host))
}

/// The fixed catalog as an [`EndpointCatalog`] implementation.
pub struct StaticCatalog;

impl EndpointCatalog for StaticCatalog {
    fn lookup(&self, region: &str) -> Option<WebsiteEndpoint> {
        lookup(region)
    }
}
