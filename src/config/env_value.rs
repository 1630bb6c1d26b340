// ABOUTME: Config values that are either literal or read from an environment variable.
// ABOUTME: Resolved once while building the deployment context.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// `bucket: site-prod` or `bucket: { env: SITE_BUCKET, default: site-prod }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        env: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// An unset or empty variable falls back to `default`.
    pub fn resolve(&self) -> Result<String> {
        let (name, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { env, default } => (env, default),
        };

        std::env::var(name)
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| default.clone())
            .ok_or_else(|| Error::MissingEnvVar(name.clone()))
    }
}

pub fn resolve_optional(value: Option<&EnvValue>) -> Result<Option<String>> {
    value.map(EnvValue::resolve).transpose()
}

pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), value.resolve()?)))
        .collect()
}
