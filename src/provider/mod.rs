// ABOUTME: Provider layer for object storage, CDN, and provisioning services.
// ABOUTME: Capability traits plus the AWS SDK adapters that implement them.

pub mod aws;
pub mod traits;

pub use aws::{AwsProviders, CloudFormationProvisioner, CloudFrontCdn, S3Store};
pub use traits::*;
