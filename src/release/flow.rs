// ABOUTME: Generic release struct parameterized by state marker.
// ABOUTME: Each transition consumes self and returns the next state on success.

use crate::config::DeployContext;
use crate::provider::{CdnOps, ObjectStore};
use crate::types::{DeploymentTarget, Version};

use super::cutover::{CutoverReport, cutover_with_retry};
use super::error::ReleaseError;
use super::planner::{RedeployPolicy, check_idempotent};
use super::state::{Live, Planned, Uploaded};
use super::upload::{UploadProgress, collect_artifacts, upload};

/// A release in progress, parameterized by its current state.
///
/// `Release<Uploaded>` can only be obtained by uploading every artifact, and
/// `cutover` only exists on `Release<Uploaded>`, so a distribution can never
/// be pointed at a partially uploaded prefix.
#[derive(Debug)]
pub struct Release<S> {
    context: DeployContext,
    redeploy: bool,
    state: S,
}

impl<S> Release<S> {
    pub fn context(&self) -> &DeployContext {
        &self.context
    }

    pub fn version(&self) -> &Version {
        &self.context.version
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.context.target
    }

    /// Whether this release overwrites a version that was already present.
    pub fn is_redeploy(&self) -> bool {
        self.redeploy
    }
}

// =============================================================================
// Planning
// =============================================================================

impl Release<Planned> {
    /// Check the version against storage and apply the redeploy policy.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::AlreadyDeployed` if the version exists and the
    /// policy declines to redeploy, or `ReleaseError::StorageUnavailable` if
    /// storage cannot be listed.
    pub async fn plan<S: ObjectStore + ?Sized>(
        store: &S,
        context: DeployContext,
        policy: &dyn RedeployPolicy,
    ) -> Result<Self, ReleaseError> {
        let deployed = check_idempotent(store, &context.target, &context.version)
            .await
            .map_err(|source| ReleaseError::StorageUnavailable {
                version: context.version.clone(),
                source,
            })?;

        if deployed && !policy.allow_redeploy(&context.version)? {
            return Err(ReleaseError::AlreadyDeployed {
                version: context.version,
            });
        }

        if deployed {
            tracing::warn!(version = %context.version, "redeploying existing version");
        }

        Ok(Release {
            context,
            redeploy: deployed,
            state: Planned,
        })
    }

    /// Upload the whole build output under the version prefix.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::UploadFailed` if any file fails. The release
    /// cannot proceed to cutover; rerunning it is safe.
    #[must_use = "release state must be used"]
    pub async fn upload<S: ObjectStore + ?Sized>(
        self,
        store: &S,
        progress: &dyn UploadProgress,
    ) -> Result<Release<Uploaded>, ReleaseError> {
        let upload_failed = |source| ReleaseError::UploadFailed {
            version: self.context.version.clone(),
            source,
        };

        let artifacts = collect_artifacts(&self.context.build_dir).map_err(upload_failed)?;
        let files = upload(
            store,
            &self.context.target.bucket,
            &self.context.version,
            &artifacts,
            self.context.upload_concurrency,
            progress,
        )
        .await
        .map_err(upload_failed)?;

        Ok(Release {
            context: self.context,
            redeploy: self.redeploy,
            state: Uploaded { files },
        })
    }
}

// =============================================================================
// Uploaded -> Live
// =============================================================================

impl Release<Uploaded> {
    pub fn files(&self) -> usize {
        self.state.files()
    }

    /// Point the CDN at this version.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::CutoverFailed`. A conflict that persists through
    /// every retry is reported with `ReleaseErrorKind::CutoverConflict`.
    #[must_use = "release state must be used"]
    pub async fn cutover<C: CdnOps + ?Sized>(
        self,
        cdn: &C,
        invalidate: bool,
    ) -> Result<Release<Live>, ReleaseError> {
        let report = cutover_with_retry(
            cdn,
            &self.context.target,
            &self.context.version,
            invalidate,
            self.context.cutover_attempts,
        )
        .await
        .map_err(|source| ReleaseError::CutoverFailed {
            version: self.context.version.clone(),
            source,
        })?;

        Ok(Release {
            context: self.context,
            redeploy: self.redeploy,
            state: Live {
                files: self.state.files,
                report,
            },
        })
    }
}

// =============================================================================
// Live
// =============================================================================

impl Release<Live> {
    pub fn files(&self) -> usize {
        self.state.files
    }

    pub fn report(&self) -> &CutoverReport {
        &self.state.report
    }

    /// Consume the release, returning its context for follow-up steps.
    pub fn finish(self) -> (DeployContext, CutoverReport) {
        (self.context, self.state.report)
    }
}
