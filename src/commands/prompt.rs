// ABOUTME: Terminal prompts and progress bars for interactive runs.
// ABOUTME: Implements the library's policy traits with dialoguer and indicatif.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect, Select};
use edgeship::error::{Error, Result};
use edgeship::prune::{PruneError, PruneSelector};
use edgeship::release::{Artifact, RedeployPolicy, ReleaseError, UploadProgress};
use edgeship::types::Version;
use indicatif::{ProgressBar, ProgressStyle};

/// Asks before overwriting an existing version prefix.
pub struct ConfirmRedeploy;

impl RedeployPolicy for ConfirmRedeploy {
    fn allow_redeploy(&self, version: &Version) -> std::result::Result<bool, ReleaseError> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Version {} is already deployed. Upload it again?",
                version
            ))
            .default(false)
            .interact()
            .map_err(|e| ReleaseError::Prompt(e.to_string()))
    }
}

/// Lets the operator pick which candidates to delete; all start checked.
pub struct InteractiveSelect;

impl PruneSelector for InteractiveSelect {
    fn select(
        &self,
        excluded: &[Version],
        candidates: &[Version],
    ) -> std::result::Result<Vec<Version>, PruneError> {
        for version in excluded {
            eprintln!("  kept: v{}", version);
        }

        let items: Vec<String> = candidates.iter().map(|v| format!("v{}", v)).collect();
        let defaults = vec![true; items.len()];

        let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Versions to delete")
            .items(&items)
            .defaults(&defaults)
            .interact()
            .map_err(|e| PruneError::Selection {
                message: e.to_string(),
            })?;

        Ok(chosen.into_iter().map(|i| candidates[i].clone()).collect())
    }
}

/// Pick an environment when none was given and the config has several.
pub fn choose_environment(names: &[&str]) -> Result<String> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Environment")
        .items(names)
        .default(0)
        .interact()
        .map_err(|e| Error::Prompt(e.to_string()))?;

    Ok(names[index].to_string())
}

/// Upload progress drawn as a bar on stderr.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl UploadProgress for ProgressReporter {
    fn on_started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn on_uploaded(&self, artifact: &Artifact, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
        self.bar.set_message(artifact.relative_path.clone());
    }

    fn on_finished(&self) {
        self.bar.finish_and_clear();
    }
}
