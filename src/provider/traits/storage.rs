// ABOUTME: Object storage operations trait.
// ABOUTME: List with delimiter grouping, put with cache/encoding headers, batch delete.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::types::BucketName;

/// Object storage operations for a bucket-addressed store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of keys under a prefix.
    ///
    /// With a delimiter, keys sharing the next path segment are grouped into
    /// `common_prefixes` instead of being returned as objects.
    async fn list(&self, bucket: &BucketName, request: &ListRequest)
    -> Result<ListPage, StorageError>;

    /// Upload a single object.
    async fn put(&self, bucket: &BucketName, object: PutObject) -> Result<(), StorageError>;

    /// Delete keys in one batch call.
    ///
    /// Returns the keys the provider reported as not deleted.
    async fn delete_batch(
        &self,
        bucket: &BucketName,
        keys: &[String],
    ) -> Result<Vec<DeleteFailure>, StorageError>;
}

/// Parameters for a single list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub prefix: String,
    pub delimiter: Option<String>,
    pub max_keys: Option<i32>,
    pub continuation: Option<String>,
}

impl ListRequest {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// One page of list results.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub common_prefixes: Vec<String>,
    pub objects: Vec<ObjectSummary>,
    /// Present when more results are available.
    pub next_continuation: Option<String>,
}

impl ListPage {
    pub fn is_empty(&self) -> bool {
        self.common_prefixes.is_empty() && self.objects.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// An object to upload with its HTTP metadata.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub cache_control: String,
    pub content_encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub key: String,
    pub message: String,
}

/// Errors from storage operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("bucket not found: {0}")]
    NoSuchBucket(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Follow continuation tokens until the listing is exhausted.
pub async fn list_all<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &BucketName,
    mut request: ListRequest,
) -> Result<ListPage, StorageError> {
    let mut all = ListPage::default();

    loop {
        let page = store.list(bucket, &request).await?;
        all.common_prefixes.extend(page.common_prefixes);
        all.objects.extend(page.objects);

        match page.next_continuation {
            Some(token) => request.continuation = Some(token),
            None => break,
        }
    }

    Ok(all)
}
