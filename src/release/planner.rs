// ABOUTME: Release planning: idempotency check of a version against storage.
// ABOUTME: Never mutates storage; the redeploy decision is delegated to a policy.

use crate::provider::{ListRequest, ObjectStore, StorageError};
use crate::types::{DeploymentTarget, Version};

use super::error::ReleaseError;

/// Decides whether an already-deployed version may be uploaded again.
pub trait RedeployPolicy: Send + Sync {
    fn allow_redeploy(&self, version: &Version) -> Result<bool, ReleaseError>;
}

/// Fixed redeploy decision for non-interactive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Always,
    Never,
}

impl RedeployPolicy for Override {
    fn allow_redeploy(&self, _version: &Version) -> Result<bool, ReleaseError> {
        Ok(matches!(self, Override::Always))
    }
}

/// Whether any object exists under the version prefix.
///
/// An empty listing is a normal "not deployed" answer; only transport or
/// permission failures are errors.
pub async fn check_idempotent<S: ObjectStore + ?Sized>(
    store: &S,
    target: &DeploymentTarget,
    version: &Version,
) -> Result<bool, StorageError> {
    let request = ListRequest::prefix(version.prefix()).max_keys(1);
    let page = store.list(&target.bucket, &request).await?;
    let deployed = !page.is_empty();

    tracing::debug!(
        bucket = %target.bucket,
        version = %version,
        deployed,
        "checked version prefix"
    );

    Ok(deployed)
}
