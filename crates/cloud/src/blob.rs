//! Blob storage provider trait and implementations.
//!
//! Media objects are opaque blobs keyed `{userId}/{pokemonId}/{uuid}.{ext}`,
//! immutable once stored except for deletion. The shared-view path hands
//! out time-boxed signed URLs instead of the permanent public URL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

/// Lifetime of signed GET URLs issued for shared views.
const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Error type for blob operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Blob storage error: {0}")]
    Provider(String),
}

/// The blob-storage contract the rest of the system depends on.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob, returning its stable public URL.
    async fn put(
        &self,
        blob_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError>;

    /// Delete a blob. Missing blobs yield [`BlobError::NotFound`].
    async fn delete(&self, blob_name: &str) -> Result<(), BlobError>;

    /// A time-boxed signed GET URL for a blob (shared-view access).
    async fn signed_get_url(&self, blob_name: &str) -> Result<String, BlobError>;

    /// The stable public URL a stored blob is reachable under.
    fn public_url(&self, blob_name: &str) -> String;

    /// The blob name a previously issued public URL refers to, if the
    /// URL belongs to this store.
    fn blob_name_from_url(&self, url: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// S3 implementation
// ---------------------------------------------------------------------------

/// S3-backed blob store.
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    /// Public base URL blobs are served under (no trailing slash).
    public_base: String,
}

impl S3BlobStore {
    /// Build a store from the ambient AWS config.
    ///
    /// `public_base` defaults to the bucket's virtual-hosted URL when not
    /// supplied.
    pub async fn from_env(bucket: String, public_base: Option<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&config);
        let region = config.region().map(|r| r.to_string()).unwrap_or_default();
        let public_base = public_base
            .unwrap_or_else(|| format!("https://{bucket}.s3.{region}.amazonaws.com"));
        Self { client, bucket, public_base }
    }

    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base: String) -> Self {
        Self { client, bucket, public_base }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        blob_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| BlobError::Provider(e.to_string()))?;

        Ok(self.public_url(blob_name))
    }

    async fn delete(&self, blob_name: &str) -> Result<(), BlobError> {
        // S3 deletes are idempotent; probe first so the caller can
        // distinguish a missing blob.
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .send()
            .await;
        if head.is_err() {
            return Err(BlobError::NotFound(blob_name.to_string()));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .send()
            .await
            .map_err(|e| BlobError::Provider(e.to_string()))?;
        Ok(())
    }

    async fn signed_get_url(&self, blob_name: &str) -> Result<String, BlobError> {
        let presigning = PresigningConfig::expires_in(SIGNED_URL_TTL)
            .map_err(|e| BlobError::Provider(e.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .presigned(presigning)
            .await
            .map_err(|e| BlobError::Provider(e.to_string()))?;
        Ok(request.uri().to_string())
    }

    fn public_url(&self, blob_name: &str) -> String {
        format!("{}/{}", self.public_base, blob_name)
    }

    fn blob_name_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", self.public_base))
            .map(str::to_string)
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// Mutex-guarded in-memory store used by tests and local runs without a
/// configured bucket.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, blob_name: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(blob_name)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        blob_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(blob_name.to_string(), (bytes, content_type.to_string()));
        Ok(self.public_url(blob_name))
    }

    async fn delete(&self, blob_name: &str) -> Result<(), BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .remove(blob_name)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(blob_name.to_string()))
    }

    async fn signed_get_url(&self, blob_name: &str) -> Result<String, BlobError> {
        if !self.contains(blob_name) {
            return Err(BlobError::NotFound(blob_name.to_string()));
        }
        Ok(format!("{}?sig=test", self.public_url(blob_name)))
    }

    fn public_url(&self, blob_name: &str) -> String {
        format!("memory://blobs/{blob_name}")
    }

    fn blob_name_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("memory://blobs/").map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = InMemoryBlobStore::new();
        let url = store
            .put("u1/25/shot.png", b"bytes".to_vec(), "image/png")
            .await
            .unwrap();
        assert_eq!(url, "memory://blobs/u1/25/shot.png");
        assert_eq!(store.blob_name_from_url(&url).as_deref(), Some("u1/25/shot.png"));
        assert!(store.contains("u1/25/shot.png"));

        store.delete("u1/25/shot.png").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_blob_is_not_found() {
        let store = InMemoryBlobStore::new();
        assert!(matches!(
            store.delete("nope").await,
            Err(BlobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn signed_url_requires_existing_blob() {
        let store = InMemoryBlobStore::new();
        assert!(store.signed_get_url("absent").await.is_err());

        store.put("a/1/x.png", vec![1], "image/png").await.unwrap();
        let signed = store.signed_get_url("a/1/x.png").await.unwrap();
        assert!(signed.contains("sig="));
    }
}
