//! Route 53 zone lookup and alias record upserts.

use aws_sdk_route53::Client;
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, HostedZone, ResourceRecordSet, RrType,
};
use tracing::{debug, info};
use uuid::Uuid;

use siteup_sync::store::WebsiteEndpoint;

use crate::error::{AwsError, AwsResult};

/// Points domains at website endpoints.
pub struct DomainManager {
    client: Client,
}

impl DomainManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Finds the hosted zone whose name is a suffix of `domain`, paging
    /// through the full zone listing.
    pub async fn find_zone(&self, domain: &str) -> AwsResult<Option<HostedZone>> {
        let mut marker: Option<String> = None;

        loop {
            let mut request = self.client.list_hosted_zones();
            if let Some(marker) = marker.take() {
                request = request.marker(marker);
            }

            let output = request
                .send()
                .await
                .map_err(|e| AwsError::Route53(format!("list hosted zones: {e}")))?;

            for zone in output.hosted_zones() {
                let zone_name = zone.name().trim_end_matches('.');
                if domain == zone_name || domain.ends_with(&format!(".{zone_name}")) {
                    debug!("domain {domain} belongs to zone {zone_name}");
                    return Ok(Some(zone.clone()));
                }
            }

            if !output.is_truncated() {
                return Ok(None);
            }
            marker = output.next_marker().map(str::to_string);
            if marker.is_none() {
                return Ok(None);
            }
        }
    }

    /// Creates a zone for the apex of `domain` (its last two labels).
    pub async fn create_zone(&self, domain: &str) -> AwsResult<HostedZone> {
        let apex = zone_apex(domain);
        let output = self
            .client
            .create_hosted_zone()
            .name(&apex)
            .caller_reference(Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| AwsError::Route53(format!("create zone {apex}: {e}")))?;

        info!("created hosted zone {apex}");
        output
            .hosted_zone()
            .cloned()
            .ok_or_else(|| AwsError::Route53(format!("create zone {apex} returned no zone")))
    }

    /// Finds the zone covering `domain`, creating one when none exists.
    pub async fn ensure_zone(&self, domain: &str) -> AwsResult<HostedZone> {
        match self.find_zone(domain).await? {
            Some(zone) => Ok(zone),
            None => self.create_zone(domain).await,
        }
    }

    /// Upserts an alias A record pointing `domain` at the website
    /// endpoint. The alias targets the endpoint's own hosted zone.
    pub async fn upsert_alias(
        &self,
        zone_id: &str,
        domain: &str,
        endpoint: &WebsiteEndpoint,
    ) -> AwsResult<()> {
        let alias = AliasTarget::builder()
            .hosted_zone_id(&endpoint.zone_id)
            .dns_name(&endpoint.host)
            .evaluate_target_health(false)
            .build()
            .map_err(|e| AwsError::Route53(format!("alias target: {e}")))?;

        let record = ResourceRecordSet::builder()
            .name(domain)
            .r#type(RrType::A)
            .alias_target(alias)
            .build()
            .map_err(|e| AwsError::Route53(format!("record set: {e}")))?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record)
            .build()
            .map_err(|e| AwsError::Route53(format!("change: {e}")))?;

        let batch = ChangeBatch::builder()
            .comment("managed by siteup")
            .changes(change)
            .build()
            .map_err(|e| AwsError::Route53(format!("change batch: {e}")))?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| AwsError::Route53(format!("record upsert for {domain}: {e}")))?;

        info!("alias record upserted for {domain}");
        Ok(())
    }
}

/// The id usable in record-change calls. Route 53 prefixes zone ids with
/// `/hostedzone/` in listing output.
pub fn zone_record_id(zone: &HostedZone) -> &str {
    zone.id().trim_start_matches("/hostedzone/")
}

/// Last two labels of `domain`, with the trailing dot zone names carry.
fn zone_apex(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').collect();
    let start = labels.len().saturating_sub(2);
    let mut apex = labels[start..].join(".");
    apex.push('.');
    apex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_keeps_last_two_labels() {
        assert_eq!(zone_apex("blog.example.com"), "example.com.");
        assert_eq!(zone_apex("a.b.c.example.net"), "example.net.");
        assert_eq!(zone_apex("example.org"), "example.org.");
    }
}
