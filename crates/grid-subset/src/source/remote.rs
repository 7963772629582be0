//! Remote object stores for Zarr access.
//!
//! S3-compatible and plain HTTP stores are wrapped for the synchronous
//! zarrs API, so a remote array is read by the same
//! [`ZarrDataSource`](super::ZarrDataSource) as a local one.

use std::sync::Arc;

use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::http::{HttpBuilder, HttpStore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zarrs_object_store::AsyncObjectStore;
use zarrs_storage::storage_adapter::async_to_sync::{
    AsyncToSyncBlockOn, AsyncToSyncStorageAdapter,
};

use crate::error::{OpenErrorKind, Result, SubsetError};

/// Blocking executor usable from inside a tokio runtime.
///
/// Moves the current task off the async worker with `block_in_place` and
/// drives the future on the current runtime handle. Needs a multi-threaded
/// runtime.
#[derive(Debug, Clone, Copy)]
pub struct TokioBlockOn;

impl AsyncToSyncBlockOn for TokioBlockOn {
    fn block_on<F: core::future::Future>(&self, future: F) -> F::Output {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
    }
}

/// Connection settings for an S3-compatible store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStoreConfig {
    /// Endpoint URL (e.g., "http://minio:9000")
    pub endpoint: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Region ("us-east-1" for MinIO)
    pub region: String,
    /// Allow plain HTTP endpoints
    pub allow_http: bool,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            bucket: "grids".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

impl RemoteStoreConfig {
    /// Read settings from `S3_*` environment variables, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| std::env::var(key).unwrap_or(fallback);
        Self {
            endpoint: var("S3_ENDPOINT", defaults.endpoint),
            bucket: var("S3_BUCKET", defaults.bucket),
            access_key_id: var("S3_ACCESS_KEY", defaults.access_key_id),
            secret_access_key: var("S3_SECRET_KEY", defaults.secret_access_key),
            region: var("S3_REGION", defaults.region),
            allow_http: std::env::var("S3_ALLOW_HTTP")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.allow_http),
        }
    }
}

/// S3-backed store usable with the synchronous zarrs API.
pub type S3Storage = AsyncToSyncStorageAdapter<AsyncObjectStore<AmazonS3>, TokioBlockOn>;

/// HTTP-backed (read-only) store usable with the synchronous zarrs API.
pub type HttpStorage = AsyncToSyncStorageAdapter<AsyncObjectStore<HttpStore>, TokioBlockOn>;

/// Create a store for the bucket described by `config`.
///
/// No request is made here; an unreachable endpoint shows up on first read.
pub fn create_s3_storage(config: &RemoteStoreConfig) -> Result<Arc<S3Storage>> {
    let s3 = AmazonS3Builder::new()
        .with_endpoint(&config.endpoint)
        .with_bucket_name(&config.bucket)
        .with_access_key_id(&config.access_key_id)
        .with_secret_access_key(&config.secret_access_key)
        .with_region(&config.region)
        .with_allow_http(config.allow_http)
        .build()
        .map_err(|e| {
            SubsetError::open(
                format!("s3://{}", config.bucket),
                OpenErrorKind::RemoteUnavailable,
                format!("failed to create S3 client: {}", e),
            )
        })?;

    debug!(endpoint = %config.endpoint, bucket = %config.bucket, "Created S3 store");
    let store = AsyncToSyncStorageAdapter::new(Arc::new(AsyncObjectStore::new(s3)), TokioBlockOn);
    Ok(Arc::new(store))
}

/// Create a store rooted at `url`, for Zarr stores served over HTTP(S).
pub fn create_http_storage(url: &str) -> Result<Arc<HttpStorage>> {
    let http = HttpBuilder::new().with_url(url).build().map_err(|e| {
        SubsetError::open(
            url,
            OpenErrorKind::RemoteUnavailable,
            format!("failed to create HTTP client: {}", e),
        )
    })?;

    debug!(url = url, "Created HTTP store");
    let store = AsyncToSyncStorageAdapter::new(Arc::new(AsyncObjectStore::new(http)), TokioBlockOn);
    Ok(Arc::new(store))
}
