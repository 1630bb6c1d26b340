// ABOUTME: Build output discovery and bounded-concurrency artifact upload.
// ABOUTME: The first failed object aborts the whole upload.

use futures::{TryStreamExt, stream};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

use super::artifact::Artifact;
use super::error::UploadError;
use crate::provider::{ObjectStore, PutObject};
use crate::types::{BucketName, Version};

/// Default number of uploads in flight.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Receives upload progress. Carries no correctness meaning.
pub trait UploadProgress: Send + Sync {
    fn on_started(&self, _total: usize) {}

    fn on_uploaded(&self, artifact: &Artifact, done: usize, total: usize);

    fn on_finished(&self) {}
}

/// Discards progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl UploadProgress for NoProgress {
    fn on_uploaded(&self, _artifact: &Artifact, _done: usize, _total: usize) {}
}

/// Walk the build output and classify every regular file.
///
/// Results are sorted by relative path.
pub fn collect_artifacts(source: &Path) -> Result<Vec<Artifact>, UploadError> {
    if !source.is_dir() {
        return Err(UploadError::SourceMissing(source.to_path_buf()));
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        artifacts.push(Artifact::classify(relative, entry.path()));
    }

    if artifacts.is_empty() {
        return Err(UploadError::EmptySource(source.to_path_buf()));
    }

    artifacts.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(artifacts)
}

/// Upload every artifact under the version prefix.
///
/// Returns the number of files uploaded, which is always `artifacts.len()`
/// on success. Objects already uploaded before a failure are left in place.
pub async fn upload<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &BucketName,
    version: &Version,
    artifacts: &[Artifact],
    concurrency: usize,
    progress: &dyn UploadProgress,
) -> Result<usize, UploadError> {
    let total = artifacts.len();
    let done = AtomicUsize::new(0);
    let done = &done;

    progress.on_started(total);
    tracing::info!(version = %version, files = total, concurrency, "uploading artifacts");

    let result = stream::iter(artifacts.iter().map(Ok::<_, UploadError>))
        .try_for_each_concurrent(concurrency.max(1), |artifact| async move {
            upload_one(store, bucket, version, artifact).await?;
            let uploaded = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.on_uploaded(artifact, uploaded, total);
            Ok(())
        })
        .await;

    progress.on_finished();
    result?;

    Ok(total)
}

async fn upload_one<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &BucketName,
    version: &Version,
    artifact: &Artifact,
) -> Result<(), UploadError> {
    let raw = tokio::fs::read(&artifact.source_path)
        .await
        .map_err(|source| UploadError::Read {
            path: artifact.source_path.clone(),
            source,
        })?;

    let object = encode_off_runtime(artifact.clone(), version.clone(), raw)
        .await
        .map_err(|source| UploadError::Compress {
            path: artifact.source_path.clone(),
            source,
        })?;
    let key = object.key.clone();

    store
        .put(bucket, object)
        .await
        .map_err(|source| UploadError::ObjectFailed { key, source })
}

/// Encodes on the blocking pool; gzip at best compression is CPU-bound.
async fn encode_off_runtime(
    artifact: Artifact,
    version: Version,
    raw: Vec<u8>,
) -> std::io::Result<PutObject> {
    tokio::task::spawn_blocking(move || artifact.to_put_object(&version, raw))
        .await
        .map_err(std::io::Error::other)?
}
