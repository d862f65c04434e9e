//! S3 object-store gateway.
//!
//! Uploads switch to multipart transfer with parts of exactly the etag
//! chunk size once a file exceeds one chunk, so the etag S3 records for the
//! object reproduces the fingerprint computed locally before the upload.
//! The next run's diff then skips the file on an exact string match.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use siteup_sync::error::{SyncError, SyncResult};
use siteup_sync::etag::CHUNK_SIZE;
use siteup_sync::store::{ObjectPage, ObjectStore, RemoteObject};

/// One bucket reached through an S3 client.
pub struct BucketStore {
    client: Client,
    bucket: String,
}

impl BucketStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Multipart upload with parts of the etag chunk size.
    async fn put_multipart(&self, key: &str, path: &Path, content_type: &str) -> SyncResult<()> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| upload_err(key, e))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| SyncError::Upload {
                key: key.to_string(),
                cause: "no upload id returned".to_string(),
            })?
            .to_string();

        match self.upload_parts(key, path, &upload_id).await {
            Ok(parts) => {
                let completed = CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build();
                self.client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(completed)
                    .send()
                    .await
                    .map_err(|e| upload_err(key, e))?;
                Ok(())
            }
            Err(err) => {
                // Orphaned parts keep accruing storage cost until aborted.
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!("abort of multipart upload for {key} failed: {abort_err}");
                }
                Err(err)
            }
        }
    }

    async fn upload_parts(
        &self,
        key: &str,
        path: &Path,
        upload_id: &str,
    ) -> SyncResult<Vec<CompletedPart>> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| unreadable(path, e))?;

        let mut parts = Vec::new();
        let mut part_number = 1i32;

        loop {
            let mut buf = vec![0u8; CHUNK_SIZE];
            let filled = read_chunk(&mut file, &mut buf)
                .await
                .map_err(|e| unreadable(path, e))?;
            if filled == 0 {
                break;
            }
            buf.truncate(filled);

            let part = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(buf))
                .send()
                .await
                .map_err(|e| upload_err(key, e))?;

            parts.push(
                CompletedPart::builder()
                    .e_tag(part.e_tag().unwrap_or_default())
                    .part_number(part_number)
                    .build(),
            );
            part_number += 1;

            if filled < CHUNK_SIZE {
                break;
            }
        }

        Ok(parts)
    }
}

#[async_trait]
impl ObjectStore for BucketStore {
    async fn list_page(&self, token: Option<String>) -> SyncResult<ObjectPage> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket);
        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let output = request
            .send()
            .await
            .map_err(|e| SyncError::RemoteList(format!("list of {}: {e}", self.bucket)))?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| match (object.key(), object.e_tag()) {
                (Some(key), Some(etag)) => Some(RemoteObject {
                    key: key.to_string(),
                    etag: etag.to_string(),
                }),
                _ => None,
            })
            .collect();

        let next_token = if output.is_truncated() == Some(true) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> SyncResult<()> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| unreadable(path, e))?
            .len();

        if size as usize <= CHUNK_SIZE {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| unreadable(path, std::io::Error::other(e)))?;
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .content_type(content_type)
                .body(body)
                .send()
                .await
                .map_err(|e| upload_err(key, e))?;
        } else {
            self.put_multipart(key, path, content_type).await?;
        }

        debug!("put {key} ({size} bytes) to s3://{}", self.bucket);
        Ok(())
    }
}

fn upload_err(key: &str, err: impl std::fmt::Display) -> SyncError {
    SyncError::Upload {
        key: key.to_string(),
        cause: err.to_string(),
    }
}

fn unreadable(path: &Path, err: std::io::Error) -> SyncError {
    SyncError::UnreadableFile {
        path: path.display().to_string(),
        cause: err.to_string(),
    }
}

/// Reads until `buf` is full or the file ends. Part boundaries must land
/// at exactly the chunk size or the stored etag diverges from the local
/// fingerprint.
async fn read_chunk(file: &mut tokio::fs::File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]).await? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
