// ABOUTME: Per-environment deployment target configuration.
// ABOUTME: Bucket, distribution, and optional region/retention/parameter overrides.

use serde::Deserialize;

use super::{EnvValue, ParametersConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Environment {
    /// Filled from the map key during deserialization.
    #[serde(skip)]
    pub name: String,

    pub bucket: EnvValue,

    pub distribution: EnvValue,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub keep: Option<usize>,

    #[serde(default)]
    pub parameters: Option<ParametersConfig>,
}
