// ABOUTME: Shared helper for loading config and selecting the environment.
// ABOUTME: Also connects the AWS providers for the environment's region.

use edgeship::config::{Config, Environment};
use edgeship::error::Result;
use edgeship::output::Output;
use edgeship::provider::AwsProviders;
use std::path::Path;

use super::prompt::choose_environment;

/// Loaded config plus the chosen environment name.
pub struct Workspace {
    pub config: Config,
    environment: String,
    /// Prompts are allowed.
    pub interactive: bool,
}

impl Workspace {
    /// Load the config and resolve the target environment.
    ///
    /// Without `--env`, a default or single environment is used; otherwise
    /// interactive runs are asked to pick one.
    pub fn open(
        cwd: &Path,
        config_path: Option<&Path>,
        env: Option<&str>,
        interactive: bool,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::discover(cwd)?,
        };

        let environment = match config.environment(env) {
            Ok(found) => found.name.clone(),
            Err(edgeship::error::Error::EnvironmentRequired(_)) if interactive => {
                choose_environment(&config.environment_names())?
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            config,
            environment,
            interactive,
        })
    }

    pub fn environment(&self) -> Result<&Environment> {
        self.config.environment(Some(&self.environment))
    }

    pub async fn providers(&self, output: &Output) -> Result<AwsProviders> {
        let env = self.environment()?;
        let region = self.config.region_for(env);
        let profile = self.config.profile()?;

        output.progress(&format!(
            "  → Connecting to AWS ({}{})",
            region,
            profile
                .as_deref()
                .map(|p| format!(", profile {p}"))
                .unwrap_or_default()
        ));

        Ok(AwsProviders::load(&region, profile.as_deref()).await)
    }
}
