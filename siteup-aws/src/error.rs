//! AWS adapter error types.

use thiserror::Error;

/// Result type for provisioning and DNS operations.
pub type AwsResult<T> = Result<T, AwsError>;

/// Errors from the adapter-only operations (the sync path reports through
/// `siteup_sync::SyncError` instead).
#[derive(Debug, Error)]
pub enum AwsError {
    #[error("s3 operation failed: {0}")]
    S3(String),

    #[error("route 53 operation failed: {0}")]
    Route53(String),

    #[error("no website endpoint known for region {0}")]
    UnknownRegion(String),
}
