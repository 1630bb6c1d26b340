// ABOUTME: Configuration types and parsing for edgeship.yml.
// ABOUTME: Handles YAML parsing, env var values, and per-environment merging.

mod context;
mod deserialize;
mod env_value;
mod environment;
mod init;
mod manifest;
mod stack;

pub use context::DeployContext;
pub use env_value::{EnvValue, resolve_env_map, resolve_optional};
pub use environment::Environment;
pub use init::init_config;
pub use manifest::{DEFAULT_MANIFEST, read_package_version};
pub use stack::{DEFAULT_STACK_NAME, DEFAULT_TEMPLATE_PATH, ParametersConfig, StackConfig};

use crate::error::{Error, Result};
use crate::prune::DEFAULT_KEEP;
use crate::release::{DEFAULT_CUTOVER_ATTEMPTS, DEFAULT_UPLOAD_CONCURRENCY};
use crate::stack::StackParameters;
use crate::types::{BucketName, DeploymentTarget, DistributionId, StackName, Version};
use deserialize::{deserialize_app, deserialize_environments};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "edgeship.yml";
pub const CONFIG_FILENAME_ALT: &str = "edgeship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".edgeship/config.yml";

pub const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_BUILD_DIR: &str = "dist";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_app")]
    pub app: String,

    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub profile: Option<EnvValue>,

    #[serde(default = "default_manifest")]
    pub package_manifest: PathBuf,

    #[serde(default = "default_upload_concurrency")]
    pub upload_concurrency: usize,

    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default)]
    pub default_environment: Option<String>,

    #[serde(default)]
    pub stack: StackConfig,

    #[serde(deserialize_with = "deserialize_environments")]
    pub environments: NonEmpty<Environment>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    #[serde(default = "default_keep")]
    pub keep: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            keep: default_keep(),
        }
    }
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUILD_DIR)
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_manifest() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST)
}

fn default_upload_concurrency() -> usize {
    DEFAULT_UPLOAD_CONCURRENCY
}

fn default_keep() -> usize {
    DEFAULT_KEEP
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.root = project_root(path);
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.upload_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "upload_concurrency must be at least 1".to_string(),
            ));
        }

        if let Some(name) = &self.default_environment
            && self.find_environment(name).is_none()
        {
            return Err(Error::InvalidConfig(format!(
                "default_environment {:?} is not defined in environments",
                name
            )));
        }

        Ok(())
    }

    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name.as_str()).collect()
    }

    fn find_environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Look up an environment by name, falling back to `default_environment`
    /// and then to the only environment when exactly one is defined.
    pub fn environment(&self, name: Option<&str>) -> Result<&Environment> {
        let name = match name.or(self.default_environment.as_deref()) {
            Some(name) => name,
            None if self.environments.len() == 1 => return Ok(self.environments.first()),
            None => {
                return Err(Error::EnvironmentRequired(
                    self.environment_names().join(", "),
                ));
            }
        };

        self.find_environment(name)
            .ok_or_else(|| Error::UnknownEnvironment {
                name: name.to_string(),
                available: self.environment_names().join(", "),
            })
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve_path(&self.package_manifest)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve_path(&self.stack.template)
    }

    pub fn region_for(&self, env: &Environment) -> String {
        env.region.clone().unwrap_or_else(|| self.region.clone())
    }

    pub fn bucket(&self, env: &Environment) -> Result<BucketName> {
        let bucket = env.bucket.resolve()?;
        BucketName::new(&bucket)
            .map_err(|e| Error::InvalidConfig(format!("environment {}: bucket: {}", env.name, e)))
    }

    /// Region and storage/CDN identifiers for one environment.
    ///
    /// Stack setup does not need this; the distribution usually does not
    /// exist until the stack has been created.
    pub fn target(&self, env: &Environment) -> Result<DeploymentTarget> {
        let bucket = self.bucket(env)?;

        let distribution = env.distribution.resolve()?;
        if distribution.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "environment {}: distribution cannot be empty",
                env.name
            )));
        }

        Ok(DeploymentTarget::new(
            bucket,
            DistributionId::new(distribution.trim()),
            self.region_for(env),
        ))
    }

    pub fn retention_keep(&self, env: &Environment) -> usize {
        env.keep.unwrap_or(self.retention.keep)
    }

    pub fn profile(&self) -> Result<Option<String>> {
        resolve_optional(self.profile.as_ref())
    }

    /// Build the immutable context for releasing `version` to `env`.
    pub fn context(&self, env: &Environment, version: Version) -> Result<DeployContext> {
        Ok(DeployContext {
            app: self.app.clone(),
            environment: env.name.clone(),
            target: self.target(env)?,
            version,
            build_dir: self.resolve_path(&self.build_dir),
            upload_concurrency: self.upload_concurrency,
            cutover_attempts: DEFAULT_CUTOVER_ATTEMPTS,
            retention_keep: self.retention_keep(env),
        })
    }

    pub fn stack_name(&self, env: &Environment) -> Result<StackName> {
        StackName::from_template(&self.stack.name, &self.app, &env.name)
            .map_err(|e| Error::InvalidConfig(format!("stack name: {}", e)))
    }

    /// Template parameters with the environment's overrides applied.
    pub fn stack_parameters(&self, env: &Environment) -> Result<StackParameters> {
        let bucket = self.bucket(env)?;
        let overlay = match &env.parameters {
            Some(p) => self.stack.parameters.merged_with(p),
            None => self.stack.parameters.clone(),
        };

        let mut params = StackParameters::new(env.name.clone(), bucket);
        params.domain_name = resolve_optional(overlay.domain_name.as_ref())?;
        params.certificate_arn = resolve_optional(overlay.certificate_arn.as_ref())?;
        if let Some(price_class) = overlay.price_class {
            params.price_class = price_class;
        }
        params.extra = resolve_env_map(&overlay.extra)?;

        Ok(params)
    }
}

/// `.edgeship/config.yml` belongs to the directory above `.edgeship`.
fn project_root(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new("."));
    if parent.file_name().is_some_and(|n| n == ".edgeship") {
        parent.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}
