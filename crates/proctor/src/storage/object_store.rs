// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MinIO/S3-compatible object store client. Mirrors `minio_client.py`'s
//! three operations: ensure a bucket exists, upload bytes, download bytes.
//! Non-fatal by design — every failure is logged and returned as `None`/an
//! error the caller can swallow, never a panic.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::Config;

#[derive(Clone)]
pub struct ObjectStoreClient {
    client: Client,
}

impl ObjectStoreClient {
    pub async fn connect(config: &Config) -> Self {
        let region = aws_config::Region::new("us-east-1");
        let creds = aws_sdk_s3::config::Credentials::new(
            &config.object_store_access_key,
            &config.object_store_secret_key,
            None,
            None,
            "proctor-ai-static",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .region(region)
            .endpoint_url(&config.object_store_endpoint)
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .build();
        Self { client: Client::from_conf(s3_config) }
    }

    /// Create `bucket` if it doesn't already exist. Logs and swallows errors.
    pub async fn ensure_bucket_exists(&self, bucket: &str) {
        if self.client.head_bucket().bucket(bucket).send().await.is_ok() {
            return;
        }
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => tracing::info!(bucket, "created object store bucket"),
            Err(e) => tracing::warn!(bucket, err = %e, "could not ensure bucket exists"),
        }
    }

    /// Upload bytes under `key` in `bucket`. Returns the key on success, `None` on failure
    /// (non-fatal — proctoring continues without the snapshot).
    pub async fn upload_bytes(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Option<String> {
        self.ensure_bucket_exists(bucket).await;
        match self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
        {
            Ok(_) => Some(key.to_owned()),
            Err(e) => {
                tracing::error!(bucket, key, err = %e, "object store upload failed");
                None
            }
        }
    }

    /// Download an object. Returns `None` if it doesn't exist or the fetch failed.
    pub async fn download_bytes(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => match output.body.collect().await {
                Ok(data) => Some(data.into_bytes().to_vec()),
                Err(e) => {
                    tracing::error!(bucket, key, err = %e, "object store body read failed");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(bucket, key, err = %e, "object store download failed");
                None
            }
        }
    }

    /// Returns true if the object store is reachable.
    pub async fn check_connection(&self) -> bool {
        self.client.list_buckets().send().await.is_ok()
    }
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;
