// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles the app name and the non-empty environments map.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::Environment;

pub fn deserialize_app<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let valid = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase())
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(s)
    } else {
        Err(serde::de::Error::custom(format!(
            "app name must start with a lowercase letter and contain only lowercase letters, digits, and hyphens: {:?}",
            s
        )))
    }
}

/// Environment map in name order, with each entry's name filled in.
pub fn deserialize_environments<'de, D>(
    deserializer: D,
) -> Result<NonEmpty<Environment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let map: BTreeMap<String, Environment> = BTreeMap::deserialize(deserializer)?;
    let environments = map
        .into_iter()
        .map(|(name, mut env)| {
            if name.trim().is_empty() {
                return Err(serde::de::Error::custom("environment name cannot be empty"));
            }
            env.name = name;
            Ok(env)
        })
        .collect::<Result<Vec<_>, D::Error>>()?;

    NonEmpty::from_vec(environments)
        .ok_or_else(|| serde::de::Error::custom("at least one environment is required"))
}
