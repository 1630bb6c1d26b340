// ABOUTME: CDN cutover to a version prefix under optimistic concurrency.
// ABOUTME: The origin swap is authoritative; invalidation afterwards is best effort.

use crate::provider::{CdnError, CdnOps, OriginRouting, OriginTarget};
use crate::types::{DeploymentTarget, DistributionId, InvalidationId, Version};

use super::error::CutoverError;

/// Default root object of the distribution after cutover.
pub const SPA_ENTRY: &str = "index.html";

/// Invalidation path covering every cached object.
pub const INVALIDATE_ALL: &str = "/*";

/// Attempts made by [`cutover_with_retry`] before giving up on conflicts.
pub const DEFAULT_CUTOVER_ATTEMPTS: u32 = 3;

/// Outcome of the post-cutover invalidation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationOutcome {
    Skipped,
    Requested(InvalidationId),
    /// The cutover stands; edges serve stale copies until they expire.
    Failed(String),
}

/// What a successful cutover changed.
#[derive(Debug, Clone)]
pub struct CutoverReport {
    pub distribution: DistributionId,
    pub version: Version,
    pub origin: OriginTarget,
    /// Origin the distribution pointed at before the swap.
    pub previous: Option<OriginTarget>,
    pub attempts: u32,
    pub invalidation: InvalidationOutcome,
}

/// Origin routing for a version of the target bucket.
pub fn origin_for(target: &DeploymentTarget, version: &Version) -> OriginTarget {
    OriginTarget {
        id: format!("{}-v{}", target.bucket, version),
        domain_name: target.origin_domain(),
        origin_path: version.origin_path(),
    }
}

/// Repoint the distribution at `version` in a single conditional update.
///
/// # Errors
///
/// Returns [`CutoverError::Conflict`] if the distribution changed after it was
/// fetched; nothing was written and the caller may retry.
pub async fn cutover<C: CdnOps + ?Sized>(
    cdn: &C,
    target: &DeploymentTarget,
    version: &Version,
    invalidate: bool,
) -> Result<CutoverReport, CutoverError> {
    let previous = swap_origin(cdn, target, version).await?;
    Ok(finish(cdn, target, version, previous, 1, invalidate).await)
}

/// Like [`cutover`], refetching and retrying only on concurrency conflicts.
pub async fn cutover_with_retry<C: CdnOps + ?Sized>(
    cdn: &C,
    target: &DeploymentTarget,
    version: &Version,
    invalidate: bool,
    attempts: u32,
) -> Result<CutoverReport, CutoverError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match swap_origin(cdn, target, version).await {
            Ok(previous) => {
                return Ok(finish(cdn, target, version, previous, attempt, invalidate).await);
            }
            Err(CutoverError::Conflict { distribution }) if attempt < attempts => {
                tracing::warn!(
                    distribution = %distribution,
                    attempt,
                    "distribution changed during cutover, refetching"
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Version the distribution currently serves, read from its origin path.
///
/// Returns `None` when the origin does not point at a version prefix.
pub async fn live_version<C: CdnOps + ?Sized>(
    cdn: &C,
    distribution: &DistributionId,
) -> Result<Option<Version>, CdnError> {
    let summary = cdn.get_distribution(distribution).await?;
    Ok(summary
        .origins
        .first()
        .and_then(|origin| Version::from_origin_path(&origin.origin_path)))
}

/// Fetch, rewrite, and conditionally submit the distribution config.
async fn swap_origin<C: CdnOps + ?Sized>(
    cdn: &C,
    target: &DeploymentTarget,
    version: &Version,
) -> Result<Option<OriginTarget>, CutoverError> {
    let distribution = &target.distribution;
    let tagged = cdn.get_distribution_config(distribution).await?;
    let mut config = tagged.config;

    let origins = config.origin_targets();
    if origins.len() != 1 {
        return Err(CutoverError::UnsupportedOrigins {
            distribution: distribution.clone(),
            count: origins.len(),
        });
    }
    let previous = origins.into_iter().next();

    let origin = origin_for(target, version);
    config.set_default_root_object(SPA_ENTRY);
    config.replace_single_origin(&origin);

    match cdn
        .update_distribution(distribution, config, &tagged.token)
        .await
    {
        Ok(_) => {
            tracing::info!(
                distribution = %distribution,
                origin_path = %origin.origin_path,
                "distribution repointed"
            );
            Ok(previous)
        }
        Err(CdnError::PreconditionFailed(_)) => Err(CutoverError::Conflict {
            distribution: distribution.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}

async fn finish<C: CdnOps + ?Sized>(
    cdn: &C,
    target: &DeploymentTarget,
    version: &Version,
    previous: Option<OriginTarget>,
    attempts: u32,
    invalidate: bool,
) -> CutoverReport {
    let invalidation = if invalidate {
        match cdn
            .create_invalidation(&target.distribution, &[INVALIDATE_ALL.to_string()])
            .await
        {
            Ok(id) => InvalidationOutcome::Requested(id),
            Err(e) => {
                tracing::warn!(distribution = %target.distribution, "invalidation failed: {}", e);
                InvalidationOutcome::Failed(e.to_string())
            }
        }
    } else {
        InvalidationOutcome::Skipped
    };

    CutoverReport {
        distribution: target.distribution.clone(),
        version: version.clone(),
        origin: origin_for(target, version),
        previous,
        attempts,
        invalidation,
    }
}
