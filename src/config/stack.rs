// ABOUTME: Stack provisioning section of the config file.
// ABOUTME: Name template, template path, polling, and template parameters.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use super::EnvValue;
use crate::stack::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_STACK_NAME: &str = "{app}-{env}";
pub const DEFAULT_TEMPLATE_PATH: &str = "infra/site.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    /// Supports `{app}` and `{env}` placeholders.
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_template")]
    pub template: PathBuf,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_termination_protection")]
    pub termination_protection: bool,

    #[serde(default)]
    pub parameters: ParametersConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            template: default_template(),
            poll_interval: default_poll_interval(),
            termination_protection: default_termination_protection(),
            parameters: ParametersConfig::default(),
        }
    }
}

/// Optional template parameters. Environments override field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParametersConfig {
    #[serde(default)]
    pub domain_name: Option<EnvValue>,

    #[serde(default)]
    pub certificate_arn: Option<EnvValue>,

    #[serde(default)]
    pub price_class: Option<String>,

    #[serde(default)]
    pub extra: BTreeMap<String, EnvValue>,
}

impl ParametersConfig {
    /// Overlay `other` onto `self`. Set fields in `other` win; `extra` is
    /// merged key by key.
    pub fn merged_with(&self, other: &ParametersConfig) -> ParametersConfig {
        let mut merged = self.clone();

        if other.domain_name.is_some() {
            merged.domain_name = other.domain_name.clone();
        }
        if other.certificate_arn.is_some() {
            merged.certificate_arn = other.certificate_arn.clone();
        }
        if other.price_class.is_some() {
            merged.price_class = other.price_class.clone();
        }
        for (k, v) in &other.extra {
            merged.extra.insert(k.clone(), v.clone());
        }

        merged
    }
}

fn default_name() -> String {
    DEFAULT_STACK_NAME.to_string()
}

fn default_template() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_termination_protection() -> bool {
    true
}
