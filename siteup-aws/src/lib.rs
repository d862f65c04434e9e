//! AWS adapters for siteup.
//!
//! Concrete implementations behind the interfaces the sync core consumes:
//! - [`s3::BucketStore`]: the S3 object-store gateway, with multipart
//!   transfers aligned to the etag chunk size
//! - [`bucket::BucketProvisioner`]: bucket creation and static-website
//!   configuration
//! - [`endpoints`]: the region to website-endpoint catalog
//! - [`dns::DomainManager`]: Route 53 zone lookup and alias records
//!
//! Adapters hold plain SDK clients handed in by the caller; nothing here
//! owns credentials or process-wide state.

pub mod bucket;
pub mod dns;
pub mod endpoints;
pub mod error;
pub mod s3;

pub use bucket::BucketProvisioner;
pub use dns::DomainManager;
pub use error::{AwsError, AwsResult};
pub use s3::BucketStore;
