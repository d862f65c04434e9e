//! Bucket provisioning for static website hosting.

use aws_sdk_s3::Client;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    WebsiteConfiguration,
};
use tracing::{debug, info};

use crate::error::{AwsError, AwsResult};

/// Creates and configures buckets; the sync path never goes through here.
pub struct BucketProvisioner {
    client: Client,
}

impl BucketProvisioner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates `name` in `region`, succeeding quietly when the bucket
    /// already exists and is owned by this account. Any other create
    /// failure is an error.
    pub async fn ensure_bucket(&self, name: &str, region: &str) -> AwsResult<()> {
        let mut request = self.client.create_bucket().bucket(name);

        // us-east-1 is the default location and rejects an explicit
        // constraint naming it.
        if region != "us-east-1" {
            let config = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build();
            request = request.create_bucket_configuration(config);
        }

        match request.send().await {
            Ok(_) => {
                info!("created bucket {name} in {region}");
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_bucket_already_owned_by_you() {
                    debug!("bucket {name} already exists and is ours");
                    Ok(())
                } else {
                    Err(AwsError::S3(format!("create bucket {name}: {service_err}")))
                }
            }
        }
    }

    /// Attaches a policy allowing anonymous `GetObject` on every key.
    pub async fn allow_public_read(&self, name: &str) -> AwsResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(name)
            .policy(public_read_policy(name))
            .send()
            .await
            .map_err(|e| AwsError::S3(format!("put policy on {name}: {e}")))?;
        Ok(())
    }

    /// Turns on static-website hosting with the given index and error
    /// documents.
    pub async fn enable_website(&self, name: &str, index: &str, error: &str) -> AwsResult<()> {
        let config = WebsiteConfiguration::builder()
            .index_document(
                IndexDocument::builder()
                    .suffix(index)
                    .build()
                    .map_err(|e| AwsError::S3(format!("website config: {e}")))?,
            )
            .error_document(
                ErrorDocument::builder()
                    .key(error)
                    .build()
                    .map_err(|e| AwsError::S3(format!("website config: {e}")))?,
            )
            .build();

        self.client
            .put_bucket_website()
            .bucket(name)
            .website_configuration(config)
            .send()
            .await
            .map_err(|e| AwsError::S3(format!("enable website on {name}: {e}")))?;

        info!("website hosting enabled on {name}");
        Ok(())
    }

    /// The region a bucket lives in. S3 reports the default region as an
    /// empty constraint.
    pub async fn bucket_region(&self, name: &str) -> AwsResult<String> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(name)
            .send()
            .await
            .map_err(|e| AwsError::S3(format!("location of {name}: {e}")))?;

        Ok(match output.location_constraint() {
            Some(constraint) if !constraint.as_str().is_empty() => constraint.as_str().to_string(),
            _ => "us-east-1".to_string(),
        })
    }

    /// Names of every bucket in the account.
    pub async fn bucket_names(&self) -> AwsResult<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| AwsError::S3(format!("list buckets: {e}")))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(String::from))
            .collect())
    }
}

fn public_read_policy(bucket: &str) -> String {
    format!(
        r#"{{"Version":"2012-10-17","Statement":[{{"Sid":"PublicRead","Effect":"Allow","Principal":"*","Action":["s3:GetObject"],"Resource":["arn:aws:s3:::{bucket}/*"]}}]}}"#
    )
}
