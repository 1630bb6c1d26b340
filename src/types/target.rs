// ABOUTME: Deployment target resolved from configuration.
// ABOUTME: Read-only view of the bucket, distribution, and region a release goes to.

use super::{BucketName, DistributionId};

/// Where a release is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub bucket: BucketName,
    pub distribution: DistributionId,
    pub region: String,
}

impl DeploymentTarget {
    pub fn new(bucket: BucketName, distribution: DistributionId, region: impl Into<String>) -> Self {
        Self {
            bucket,
            distribution,
            region: region.into(),
        }
    }

    /// Regional virtual-hosted domain of the bucket, used as the CDN origin.
    pub fn origin_domain(&self) -> String {
        format!("{}.s3.{}.amazonaws.com", self.bucket, self.region)
    }
}
