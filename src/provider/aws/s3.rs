// ABOUTME: S3-backed object store.
// ABOUTME: Maps ListObjectsV2, PutObject, and DeleteObjects onto ObjectStore.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime as SmithyDateTime};
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::service_error;
use crate::provider::traits::{
    DeleteFailure, ListPage, ListRequest, ObjectStore, ObjectSummary, PutObject, StorageError,
};
use crate::types::BucketName;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_storage_error<E, R>(err: SdkError<E, R>, bucket: &BucketName) -> StorageError
where
    E: aws_sdk_s3::error::ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match service_error(&err) {
        Some(("NoSuchBucket", _)) => StorageError::NoSuchBucket(bucket.to_string()),
        Some(("AccessDenied", message)) => {
            StorageError::AccessDenied(format!("{}: {}", bucket, message))
        }
        _ => StorageError::Unavailable(format!("{}: {}", bucket, DisplayErrorContext(&err))),
    }
}

fn to_chrono(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

// =============================================================================
// S3Store
// =============================================================================

/// Object store backed by an S3 client.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(
        &self,
        bucket: &BucketName,
        request: &ListRequest,
    ) -> Result<ListPage, StorageError> {
        tracing::debug!(bucket = %bucket, prefix = %request.prefix, "listing objects");

        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket.as_str())
            .prefix(&request.prefix)
            .set_delimiter(request.delimiter.clone())
            .set_max_keys(request.max_keys)
            .set_continuation_token(request.continuation.clone())
            .send()
            .await
            .map_err(|e| map_storage_error(e, bucket))?;

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_owned))
            .collect();

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| {
                Some(ObjectSummary {
                    key: object.key()?.to_owned(),
                    size: object.size().unwrap_or_default(),
                    last_modified: object.last_modified().and_then(to_chrono),
                })
            })
            .collect();

        let next_continuation = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_owned)
        } else {
            None
        };

        Ok(ListPage {
            common_prefixes,
            objects,
            next_continuation,
        })
    }

    async fn put(&self, bucket: &BucketName, object: PutObject) -> Result<(), StorageError> {
        tracing::debug!(bucket = %bucket, key = %object.key, "uploading object");

        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(object.key)
            .body(ByteStream::from(object.body))
            .set_content_type(object.content_type)
            .cache_control(object.cache_control)
            .set_content_encoding(object.content_encoding)
            .send()
            .await
            .map_err(|e| map_storage_error(e, bucket))?;

        Ok(())
    }

    async fn delete_batch(
        &self,
        bucket: &BucketName,
        keys: &[String],
    ) -> Result<Vec<DeleteFailure>, StorageError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(bucket = %bucket, count = keys.len(), "deleting objects");

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::Unavailable(format!("invalid delete request: {}", e)))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| StorageError::Unavailable(format!("invalid delete request: {}", e)))?;

        let output = self
            .client
            .delete_objects()
            .bucket(bucket.as_str())
            .delete(delete)
            .send()
            .await
            .map_err(|e| map_storage_error(e, bucket))?;

        Ok(output
            .errors()
            .iter()
            .map(|failure| DeleteFailure {
                key: failure.key().unwrap_or_default().to_owned(),
                message: failure
                    .message()
                    .or(failure.code())
                    .unwrap_or("unknown error")
                    .to_owned(),
            })
            .collect())
    }
}
