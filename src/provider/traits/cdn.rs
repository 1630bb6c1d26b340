// ABOUTME: CDN distribution operations trait.
// ABOUTME: Token-guarded config updates, invalidations, and origin routing edits.

use async_trait::async_trait;
use std::fmt;

use crate::types::{DistributionId, InvalidationId};

/// CDN distribution operations.
///
/// `Config` is the provider's own distribution config type. The cutover only
/// touches it through [`OriginRouting`], so every field it does not know about
/// is sent back unchanged.
#[async_trait]
pub trait CdnOps: Send + Sync {
    type Config: OriginRouting + Clone + Send + Sync;

    /// Fetch the current config with its concurrency token.
    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<Tagged<Self::Config>, CdnError>;

    /// Replace the config, conditioned on the token from a prior fetch.
    ///
    /// Returns the new token. A stale token yields [`CdnError::PreconditionFailed`].
    async fn update_distribution(
        &self,
        id: &DistributionId,
        config: Self::Config,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError>;

    /// Request edge cache invalidation for the given paths.
    async fn create_invalidation(
        &self,
        id: &DistributionId,
        paths: &[String],
    ) -> Result<InvalidationId, CdnError>;

    /// Get a summary of the distribution as currently deployed.
    async fn get_distribution(&self, id: &DistributionId) -> Result<DistributionSummary, CdnError>;
}

/// Read and rewrite the origin routing of a distribution config.
pub trait OriginRouting {
    /// Origins currently configured, in provider order.
    fn origin_targets(&self) -> Vec<OriginTarget>;

    fn set_default_root_object(&mut self, object: &str);

    /// Rewrite the only origin and move every cache behavior that targeted it
    /// to the new id.
    ///
    /// Callers must check that exactly one origin exists first.
    fn replace_single_origin(&mut self, origin: &OriginTarget);
}

/// The routing-relevant fields of an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginTarget {
    pub id: String,
    pub domain_name: String,
    /// Path prefix appended to requests, empty when unset.
    pub origin_path: String,
}

/// A value paired with the optimistic-concurrency token it was read with.
#[derive(Debug, Clone)]
pub struct Tagged<C> {
    pub config: C,
    pub token: ConcurrencyToken,
}

/// Optimistic-concurrency token (an ETag) for distribution updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deployed state of a distribution.
#[derive(Debug, Clone)]
pub struct DistributionSummary {
    pub id: DistributionId,
    pub domain_name: String,
    pub aliases: Vec<String>,
    /// Provider status, e.g. `Deployed` or `InProgress`.
    pub status: String,
    pub origins: Vec<OriginTarget>,
}

/// Errors from CDN operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CdnError {
    #[error("distribution not found: {0}")]
    NotFound(String),

    #[error("concurrency token rejected: {0}")]
    PreconditionFailed(String),

    #[error("distribution config rejected: {0}")]
    InvalidConfig(String),

    #[error("cdn unavailable: {0}")]
    Unavailable(String),
}
