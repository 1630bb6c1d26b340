// ABOUTME: Immutable deployment context threaded through every release step.
// ABOUTME: Built once from config and CLI input; nothing reads ambient state afterwards.

use std::path::PathBuf;

use crate::types::{DeploymentTarget, Version};

#[derive(Debug, Clone)]
pub struct DeployContext {
    pub app: String,
    pub environment: String,
    pub target: DeploymentTarget,
    pub version: Version,
    /// Absolute path of the build output tree.
    pub build_dir: PathBuf,
    pub upload_concurrency: usize,
    pub cutover_attempts: u32,
    /// Previous versions kept by pruning.
    pub retention_keep: usize,
}
