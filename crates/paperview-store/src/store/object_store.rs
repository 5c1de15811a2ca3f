//! S3-compatible object store backend
//!
//! Works against AWS S3, Cloudflare R2, MinIO and anything else speaking the
//! S3 API. Listing re-filters and re-sorts client-side since object stores
//! offer neither suffix filters nor mtime ordering.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::DateTime;
use futures_util::StreamExt;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::document::{DocumentItem, is_pdf_key, sort_newest_first};
use crate::error::StoreError;
use crate::key::sanitize_key;
use crate::store::document_store::{DocumentStore, DocumentStream};

/// Connection parameters for an S3-compatible endpoint
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: Option<String>,
}

impl ObjectStoreConfig {
    /// Load connection parameters from environment variables.
    ///
    /// Expects `S3_ENDPOINT_URL`, `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`
    /// and `S3_BUCKET`; `S3_REGION` is optional.
    pub fn from_env() -> Result<Self, StoreError> {
        fn required(var: &str) -> Result<String, StoreError> {
            std::env::var(var).map_err(|_| {
                StoreError::Backend(format!("{var} environment variable not set"))
            })
        }

        Ok(Self {
            endpoint: required("S3_ENDPOINT_URL")?,
            access_key: required("S3_ACCESS_KEY_ID")?,
            secret_key: required("S3_SECRET_ACCESS_KEY")?,
            bucket: required("S3_BUCKET")?,
            region: std::env::var("S3_REGION").ok(),
        })
    }
}

/// Object-store document provider
pub struct ObjectStoreProvider {
    client: Client,
    bucket: String,
}

impl ObjectStoreProvider {
    /// Build a provider from explicit connection parameters.
    ///
    /// Probes the bucket with a HEAD request; a failed probe logs a warning
    /// but does not fail construction, so a temporarily unreachable backend
    /// still surfaces per-request instead of killing startup.
    pub async fn connect(config: &ObjectStoreConfig) -> Result<Self, StoreError> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "paperview",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "auto".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // MinIO and friends
            .build();

        let client = Client::from_conf(s3_config);
        let bucket = config.bucket.clone();

        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => info!(%bucket, "connected to object store"),
            Err(e) => warn!(%bucket, "could not verify bucket, continuing anyway: {e}"),
        }

        Ok(Self { client, bucket })
    }

    /// Build a provider from `S3_*` environment variables.
    pub async fn from_env() -> Result<Self, StoreError> {
        let config = ObjectStoreConfig::from_env()?;
        Self::connect(&config).await
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn to_offset(timestamp: &DateTime) -> Option<OffsetDateTime> {
        let nanos =
            i128::from(timestamp.secs()) * 1_000_000_000 + i128::from(timestamp.subsec_nanos());
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }
}

#[async_trait]
impl DocumentStore for ObjectStoreProvider {
    async fn list_documents(&self) -> Result<Vec<DocumentItem>, StoreError> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.bucket);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                StoreError::Backend(format!("failed to list bucket {}: {e}", self.bucket))
            })?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                if !is_pdf_key(key) {
                    continue;
                }
                let size = object.size().unwrap_or(0).max(0) as u64;
                let last_modified = object.last_modified().and_then(Self::to_offset);
                items.push(DocumentItem::new(key, size, last_modified));
            }

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn open_document(&self, key: &str) -> Result<DocumentStream, StoreError> {
        let key = sanitize_key(key)?;

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StoreError::NotFound(key.to_string())
                } else {
                    StoreError::Backend(format!(
                        "failed to get object {key}: {service_error}"
                    ))
                }
            })?;

        let stream = futures_util::stream::try_unfold(response.body, |mut body| async move {
            match body.try_next().await {
                Ok(Some(chunk)) => Ok(Some((chunk, body))),
                Ok(None) => Ok(None),
                Err(e) => Err(StoreError::Backend(format!("object body read failed: {e}"))),
            }
        });

        Ok(stream.boxed())
    }
}
