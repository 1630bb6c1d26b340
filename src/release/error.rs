// ABOUTME: Error types for release operations.
// ABOUTME: Covers planning, artifact upload, and CDN cutover failures.

use std::path::PathBuf;

use crate::provider::{CdnError, StorageError};
use crate::types::{DistributionId, Version};

/// Errors from collecting or uploading artifacts.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("build output not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("build output contains no files: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("failed to walk build output: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compress {}: {source}", path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload {key}: {source}")]
    ObjectFailed {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Errors from repointing the CDN.
#[derive(Debug, thiserror::Error)]
pub enum CutoverError {
    /// The distribution changed between fetch and update. Refetch and retry.
    #[error("distribution {distribution} was modified concurrently")]
    Conflict { distribution: DistributionId },

    #[error("distribution {distribution} has {count} origins, exactly one is supported")]
    UnsupportedOrigins {
        distribution: DistributionId,
        count: usize,
    },

    #[error(transparent)]
    Cdn(CdnError),
}

impl From<CdnError> for CutoverError {
    fn from(err: CdnError) -> Self {
        CutoverError::Cdn(err)
    }
}

/// Errors that end a release.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("version {version} is already deployed")]
    AlreadyDeployed { version: Version },

    #[error("storage unavailable while checking version {version}: {source}")]
    StorageUnavailable {
        version: Version,
        #[source]
        source: StorageError,
    },

    #[error("upload of version {version} failed: {source}")]
    UploadFailed {
        version: Version,
        #[source]
        source: UploadError,
    },

    #[error("cutover to version {version} failed: {source}")]
    CutoverFailed {
        version: Version,
        #[source]
        source: CutoverError,
    },

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseErrorKind {
    AlreadyDeployed,
    StorageUnavailable,
    UploadFailed,
    CutoverConflict,
    CutoverFailed,
    Prompt,
}

impl ReleaseError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ReleaseErrorKind {
        match self {
            ReleaseError::AlreadyDeployed { .. } => ReleaseErrorKind::AlreadyDeployed,
            ReleaseError::StorageUnavailable { .. } => ReleaseErrorKind::StorageUnavailable,
            ReleaseError::UploadFailed { .. } => ReleaseErrorKind::UploadFailed,
            ReleaseError::CutoverFailed {
                source: CutoverError::Conflict { .. },
                ..
            } => ReleaseErrorKind::CutoverConflict,
            ReleaseError::CutoverFailed { .. } => ReleaseErrorKind::CutoverFailed,
            ReleaseError::Prompt(_) => ReleaseErrorKind::Prompt,
        }
    }

    /// Whether rerunning the whole release could succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ReleaseErrorKind::UploadFailed | ReleaseErrorKind::CutoverConflict
        )
    }
}
