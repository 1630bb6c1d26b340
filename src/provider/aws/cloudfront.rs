// ABOUTME: CloudFront-backed CDN operations.
// ABOUTME: ETag-guarded distribution updates and OriginRouting for the SDK config type.

use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudfront::types::{DistributionConfig, InvalidationBatch, Paths};
use chrono::Utc;
use std::fmt::Debug;

use super::service_error;
use crate::provider::traits::{
    CdnError, CdnOps, ConcurrencyToken, DistributionSummary, OriginRouting, OriginTarget, Tagged,
};
use crate::types::{DistributionId, InvalidationId};

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_cdn_error<E, R>(err: SdkError<E, R>, id: &DistributionId) -> CdnError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match service_error(&err) {
        Some(("NoSuchDistribution", _)) => CdnError::NotFound(id.to_string()),
        Some(("PreconditionFailed" | "InvalidIfMatchVersion", message)) => {
            CdnError::PreconditionFailed(format!("{}: {}", id, message))
        }
        Some((code, message)) if code.starts_with("Invalid") || code == "IllegalUpdate" => {
            CdnError::InvalidConfig(format!("{}: {}", code, message))
        }
        _ => CdnError::Unavailable(format!("{}: {}", id, DisplayErrorContext(&err))),
    }
}

fn request_error(err: impl std::fmt::Display) -> CdnError {
    CdnError::InvalidConfig(format!("failed to build request: {}", err))
}

// =============================================================================
// OriginRouting for the SDK config
// =============================================================================

impl OriginRouting for DistributionConfig {
    fn origin_targets(&self) -> Vec<OriginTarget> {
        self.origins
            .as_ref()
            .map(|origins| {
                origins
                    .items
                    .iter()
                    .map(|origin| OriginTarget {
                        id: origin.id.clone(),
                        domain_name: origin.domain_name.clone(),
                        origin_path: origin.origin_path.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_default_root_object(&mut self, object: &str) {
        self.default_root_object = Some(object.to_string());
    }

    fn replace_single_origin(&mut self, target: &OriginTarget) {
        let Some(origin) = self
            .origins
            .as_mut()
            .and_then(|origins| origins.items.first_mut())
        else {
            return;
        };
        let previous_id = std::mem::replace(&mut origin.id, target.id.clone());
        origin.domain_name = target.domain_name.clone();
        origin.origin_path = Some(target.origin_path.clone());

        // Every behavior naming the old id must follow the rename or the
        // update is rejected as pointing at a missing origin.
        if let Some(behavior) = self.default_cache_behavior.as_mut()
            && behavior.target_origin_id == previous_id
        {
            behavior.target_origin_id = target.id.clone();
        }
        let path_behaviors = self
            .cache_behaviors
            .as_mut()
            .and_then(|behaviors| behaviors.items.as_mut());
        for behavior in path_behaviors.into_iter().flatten() {
            if behavior.target_origin_id == previous_id {
                behavior.target_origin_id = target.id.clone();
            }
        }
    }
}

// =============================================================================
// CloudFrontCdn
// =============================================================================

/// CDN operations backed by a CloudFront client.
#[derive(Debug, Clone)]
pub struct CloudFrontCdn {
    client: Client,
}

impl CloudFrontCdn {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CdnOps for CloudFrontCdn {
    type Config = DistributionConfig;

    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<Tagged<DistributionConfig>, CdnError> {
        tracing::debug!(distribution = %id, "fetching distribution config");

        let output = self
            .client
            .get_distribution_config()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id))?;

        let token = output
            .e_tag()
            .map(ConcurrencyToken::new)
            .ok_or_else(|| CdnError::Unavailable(format!("{}: response carried no ETag", id)))?;
        let config = output.distribution_config.ok_or_else(|| {
            CdnError::Unavailable(format!("{}: response carried no distribution config", id))
        })?;

        Ok(Tagged { config, token })
    }

    async fn update_distribution(
        &self,
        id: &DistributionId,
        config: DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError> {
        tracing::debug!(distribution = %id, token = %token, "updating distribution");

        let output = self
            .client
            .update_distribution()
            .id(id.as_str())
            .if_match(token.as_str())
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id))?;

        Ok(output
            .e_tag()
            .map(ConcurrencyToken::new)
            .unwrap_or_else(|| token.clone()))
    }

    async fn create_invalidation(
        &self,
        id: &DistributionId,
        paths: &[String],
    ) -> Result<InvalidationId, CdnError> {
        tracing::debug!(distribution = %id, ?paths, "requesting invalidation");

        let quantity = i32::try_from(paths.len()).map_err(request_error)?;
        let paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(paths.to_vec()))
            .build()
            .map_err(request_error)?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(format!("edgeship-{}", Utc::now().timestamp_millis()))
            .build()
            .map_err(request_error)?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(id.as_str())
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id))?;

        output
            .invalidation()
            .map(|invalidation| InvalidationId::new(invalidation.id()))
            .ok_or_else(|| CdnError::Unavailable(format!("{}: no invalidation returned", id)))
    }

    async fn get_distribution(&self, id: &DistributionId) -> Result<DistributionSummary, CdnError> {
        let output = self
            .client
            .get_distribution()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| map_cdn_error(e, id))?;

        let distribution = output
            .distribution()
            .ok_or_else(|| CdnError::NotFound(id.to_string()))?;
        let config = distribution.distribution_config();

        Ok(DistributionSummary {
            id: id.clone(),
            domain_name: distribution.domain_name().to_owned(),
            aliases: config
                .and_then(|c| c.aliases())
                .map(|aliases| aliases.items().to_vec())
                .unwrap_or_default(),
            status: distribution.status().to_owned(),
            origins: config.map(|c| c.origin_targets()).unwrap_or_default(),
        })
    }
}
