//! siteup: deploy static websites to S3.
//!
//! Subcommands mirror a deployment workflow end to end: provision a bucket
//! for website hosting, sync a local tree into it (uploading only changed
//! files), and point a Route 53 domain at the result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use siteup_aws::{AwsError, BucketProvisioner, BucketStore, DomainManager, dns, endpoints};
use siteup_sync::SyncEngine;
use siteup_sync::store::ObjectStore;

#[derive(Parser)]
#[command(name = "siteup", about = "Deploy static websites to S3", version)]
struct Cli {
    /// AWS profile to load credentials from.
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Region override for AWS calls.
    #[arg(long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the buckets in the account.
    ListBuckets,
    /// List the keys and etags stored in a bucket.
    ListBucketObjects { bucket: String },
    /// Create a bucket and configure it for public website hosting.
    SetupBucket {
        bucket: String,
        /// Index document served for directory requests.
        #[arg(long, default_value = "index.html")]
        index: String,
        /// Error document served for missing keys.
        #[arg(long, default_value = "error.html")]
        error: String,
    },
    /// Upload changed files from a directory to a bucket.
    Sync {
        pathname: PathBuf,
        bucket: String,
        /// Files fingerprinted and uploaded concurrently.
        #[arg(long, default_value_t = 8)]
        workers: usize,
    },
    /// Point a Route 53 domain at the bucket of the same name.
    SetupDomain { domain: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.profile.as_deref(), cli.region.as_deref()).await;

    match cli.command {
        Commands::ListBuckets => {
            for name in BucketProvisioner::new(s3(&config)).bucket_names().await? {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ListBucketObjects { bucket } => {
            list_bucket_objects(&config, &bucket).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::SetupBucket {
            bucket,
            index,
            error,
        } => {
            setup_bucket(&config, &bucket, &index, &error).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sync {
            pathname,
            bucket,
            workers,
        } => run_sync(&config, &pathname, &bucket, workers).await,
        Commands::SetupDomain { domain } => {
            setup_domain(&config, &domain).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn load_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

fn s3(config: &SdkConfig) -> aws_sdk_s3::Client {
    aws_sdk_s3::Client::new(config)
}

fn route53(config: &SdkConfig) -> aws_sdk_route53::Client {
    aws_sdk_route53::Client::new(config)
}

async fn list_bucket_objects(config: &SdkConfig, bucket: &str) -> anyhow::Result<()> {
    let store = BucketStore::new(s3(config), bucket);
    let mut token = None;

    loop {
        let page = store.list_page(token).await?;
        for object in page.objects {
            println!("{}\t{}", object.key, object.etag);
        }
        token = page.next_token;
        if token.is_none() {
            return Ok(());
        }
    }
}

async fn setup_bucket(
    config: &SdkConfig,
    bucket: &str,
    index: &str,
    error: &str,
) -> anyhow::Result<()> {
    let region = config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "us-east-1".to_string());

    let provisioner = BucketProvisioner::new(s3(config));
    provisioner.ensure_bucket(bucket, &region).await?;
    provisioner.allow_public_read(bucket).await?;
    provisioner.enable_website(bucket, index, error).await?;

    if let Some(url) = endpoints::website_url(bucket, &region) {
        println!("site: {url}");
    }
    Ok(())
}

async fn run_sync(
    config: &SdkConfig,
    pathname: &Path,
    bucket: &str,
    workers: usize,
) -> anyhow::Result<ExitCode> {
    let store = Arc::new(BucketStore::new(s3(config), bucket));
    let engine = SyncEngine::new(store).with_workers(workers);

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; letting in-flight uploads settle");
            cancel.cancel();
        }
    });

    let report = engine
        .sync(pathname)
        .await
        .with_context(|| format!("sync of {} failed", pathname.display()))?;

    for key in &report.uploaded {
        println!("uploaded {key}");
    }
    for failure in &report.failed {
        eprintln!("failed {}: {}", failure.key, failure.cause);
    }
    println!(
        "{} uploaded, {} skipped, {} failed",
        report.uploaded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    let provisioner = BucketProvisioner::new(s3(config));
    if let Ok(region) = provisioner.bucket_region(bucket).await
        && let Some(url) = endpoints::website_url(bucket, &region)
    {
        println!("site: {url}");
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn setup_domain(config: &SdkConfig, domain: &str) -> anyhow::Result<()> {
    // The site bucket carries the domain's name; its region decides which
    // website endpoint the alias must target.
    let provisioner = BucketProvisioner::new(s3(config));
    let region = provisioner.bucket_region(domain).await?;
    let endpoint =
        endpoints::lookup(&region).ok_or_else(|| AwsError::UnknownRegion(region.clone()))?;

    let domains = DomainManager::new(route53(config));
    let zone = domains.ensure_zone(domain).await?;
    domains
        .upsert_alias(dns::zone_record_id(&zone), domain, &endpoint)
        .await?;

    println!("domain ready: http://{domain}");
    Ok(())
}
