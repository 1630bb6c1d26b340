// ABOUTME: AWS SDK implementations of the provider traits.
// ABOUTME: S3 for storage, CloudFront for the CDN, CloudFormation for stacks.

mod cloudformation;
mod cloudfront;
mod s3;

pub use cloudformation::CloudFormationProvisioner;
pub use cloudfront::CloudFrontCdn;
pub use s3::S3Store;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::error::SdkError;

/// All three AWS clients built from one shared SDK config.
#[derive(Debug, Clone)]
pub struct AwsProviders {
    pub storage: S3Store,
    pub cdn: CloudFrontCdn,
    pub provisioner: CloudFormationProvisioner,
}

impl AwsProviders {
    /// Load credentials from the default provider chain.
    ///
    /// `profile` selects a named profile from the shared config files.
    pub async fn load(region: &str, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        tracing::debug!(region, profile = ?profile, "loaded AWS SDK config");

        Self {
            storage: S3Store::new(aws_sdk_s3::Client::new(&sdk_config)),
            cdn: CloudFrontCdn::new(aws_sdk_cloudfront::Client::new(&sdk_config)),
            provisioner: CloudFormationProvisioner::new(aws_sdk_cloudformation::Client::new(
                &sdk_config,
            )),
        }
    }
}

/// Service error code and message, when the failure came from the service.
fn service_error<E, R>(err: &SdkError<E, R>) -> Option<(&str, &str)>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error()
        .map(|e| (e.code().unwrap_or_default(), e.message().unwrap_or_default()))
}
