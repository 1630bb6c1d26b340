// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod bucket_name;
mod id;
mod stack_name;
mod target;
mod version;

pub use bucket_name::{BucketName, BucketNameError};
pub use id::{DistributionId, InvalidationId, StackId};
pub use stack_name::{StackName, StackNameError};
pub use target::DeploymentTarget;
pub use version::{Version, VersionError};
