// ABOUTME: Retention pruning of old release prefixes in storage.
// ABOUTME: Keeps the live version and its most recent predecessors, batch-deletes the rest.

use snafu::{ResultExt, Snafu};

use crate::provider::{ListRequest, ObjectStore, StorageError, list_all};
use crate::types::{DeploymentTarget, Version};

/// Previous versions kept besides the live one.
pub const DEFAULT_KEEP: usize = 2;

/// Largest batch the storage provider accepts in one delete call.
pub const DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PruneError {
    #[snafu(display("failed to list versions in {bucket}: {source}"))]
    ListVersions {
        bucket: String,
        source: StorageError,
    },

    #[snafu(display("failed to list objects of version {version}: {source}"))]
    ListObjects {
        version: Version,
        source: StorageError,
    },

    #[snafu(display("failed to delete version {version}: {source}"))]
    Delete {
        version: Version,
        source: StorageError,
    },

    #[snafu(display(
        "version {version} partially deleted, {} keys failed (first: {})",
        failures.len(),
        failures.first().map(|f| f.key.as_str()).unwrap_or("-")
    ))]
    DeleteFailed {
        version: Version,
        failures: Vec<crate::provider::DeleteFailure>,
    },

    #[snafu(display("version selection failed: {message}"))]
    Selection { message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneErrorKind {
    StorageUnavailable,
    DeleteFailed,
    Selection,
}

impl PruneError {
    pub fn kind(&self) -> PruneErrorKind {
        match self {
            PruneError::ListVersions { .. }
            | PruneError::ListObjects { .. }
            | PruneError::Delete { .. } => PruneErrorKind::StorageUnavailable,
            PruneError::DeleteFailed { .. } => PruneErrorKind::DeleteFailed,
            PruneError::Selection { .. } => PruneErrorKind::Selection,
        }
    }
}

/// Which versions may be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrunePlan {
    /// Too few versions exist to prune safely.
    Skipped { found: usize, required: usize },
    Ready {
        /// Never deleted, most recent first.
        excluded: Vec<Version>,
        /// Eligible for deletion, most recent first.
        candidates: Vec<Version>,
    },
}

/// Result of a prune run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    Skipped { found: usize, required: usize },
    /// Candidates existed but none were selected.
    NothingSelected { excluded: Vec<Version> },
    Pruned {
        excluded: Vec<Version>,
        deleted: Vec<Version>,
    },
}

/// Chooses which candidates to delete.
pub trait PruneSelector: Send + Sync {
    fn select(
        &self,
        excluded: &[Version],
        candidates: &[Version],
    ) -> Result<Vec<Version>, PruneError>;
}

/// Deletes every candidate without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSelect;

impl PruneSelector for AutoSelect {
    fn select(
        &self,
        _excluded: &[Version],
        candidates: &[Version],
    ) -> Result<Vec<Version>, PruneError> {
        Ok(candidates.to_vec())
    }
}

/// All release versions present in storage, most recent first.
pub async fn list_versions<S: ObjectStore + ?Sized>(
    store: &S,
    target: &DeploymentTarget,
) -> Result<Vec<Version>, StorageError> {
    let request = ListRequest::prefix("").delimiter("/");
    let listing = list_all(store, &target.bucket, request).await?;

    let mut versions: Vec<Version> = listing
        .common_prefixes
        .iter()
        .filter_map(|p| Version::from_prefix(p))
        .collect();
    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();

    tracing::debug!(bucket = %target.bucket, count = versions.len(), "listed versions");
    Ok(versions)
}

/// Split versions into protected and deletable sets.
///
/// `versions` must be most recent first. Anything ordering above `current`
/// is protected too, since it may be a release that is about to go live.
pub fn plan(versions: &[Version], current: Option<&Version>, keep: usize) -> PrunePlan {
    let required = keep + 2;
    if versions.len() < required {
        return PrunePlan::Skipped {
            found: versions.len(),
            required,
        };
    }

    let boundary = match current.and_then(|c| versions.iter().position(|v| v == c)) {
        Some(index) => index + 1 + keep,
        None => keep + 1,
    };
    let boundary = boundary.min(versions.len());

    PrunePlan::Ready {
        excluded: versions[..boundary].to_vec(),
        candidates: versions[boundary..].to_vec(),
    }
}

/// Delete every object under one version prefix.
///
/// Returns the number of objects deleted.
pub async fn delete_version<S: ObjectStore + ?Sized>(
    store: &S,
    target: &DeploymentTarget,
    version: &Version,
) -> Result<usize, PruneError> {
    let listing = list_all(store, &target.bucket, ListRequest::prefix(version.prefix()))
        .await
        .context(ListObjectsSnafu {
            version: version.clone(),
        })?;

    let keys: Vec<String> = listing.objects.into_iter().map(|o| o.key).collect();

    for chunk in keys.chunks(DELETE_BATCH_SIZE) {
        let failures = store
            .delete_batch(&target.bucket, chunk)
            .await
            .context(DeleteSnafu {
                version: version.clone(),
            })?;

        if !failures.is_empty() {
            return DeleteFailedSnafu {
                version: version.clone(),
                failures,
            }
            .fail();
        }
    }

    tracing::info!(version = %version, objects = keys.len(), "deleted version");
    Ok(keys.len())
}

/// List, plan, select, and delete. Versions are deleted one at a time and
/// the first failure stops the run.
pub async fn prune<S: ObjectStore + ?Sized>(
    store: &S,
    target: &DeploymentTarget,
    current: Option<&Version>,
    keep: usize,
    selector: &dyn PruneSelector,
) -> Result<PruneOutcome, PruneError> {
    let versions = list_versions(store, target)
        .await
        .context(ListVersionsSnafu {
            bucket: target.bucket.to_string(),
        })?;

    let (excluded, candidates) = match plan(&versions, current, keep) {
        PrunePlan::Skipped { found, required } => {
            tracing::warn!(found, required, "not enough versions to prune");
            return Ok(PruneOutcome::Skipped { found, required });
        }
        PrunePlan::Ready {
            excluded,
            candidates,
        } => (excluded, candidates),
    };

    if candidates.is_empty() {
        return Ok(PruneOutcome::NothingSelected { excluded });
    }

    // Selectors only ever see candidates; the protected set cannot be chosen.
    let selected: Vec<Version> = selector
        .select(&excluded, &candidates)?
        .into_iter()
        .filter(|v| candidates.contains(v))
        .collect();

    if selected.is_empty() {
        return Ok(PruneOutcome::NothingSelected { excluded });
    }

    let mut deleted = Vec::with_capacity(selected.len());
    for version in selected {
        delete_version(store, target, &version).await?;
        deleted.push(version);
    }

    Ok(PruneOutcome::Pruned { excluded, deleted })
}
