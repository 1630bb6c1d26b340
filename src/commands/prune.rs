// ABOUTME: Prune command implementation.
// ABOUTME: Deletes versions outside the retention window of one environment.

use edgeship::diagnostics::Diagnostics;
use edgeship::error::{Error, Result};
use edgeship::output::Output;
use edgeship::prune::{AutoSelect, PruneOutcome, PruneSelector};
use edgeship::release::live_version;
use edgeship::types::Version;

use super::Workspace;
use super::prompt::InteractiveSelect;

#[derive(Debug, Default)]
pub struct PruneOptions {
    pub keep: Option<usize>,
    pub current: Option<String>,
}

pub async fn prune(workspace: &Workspace, options: PruneOptions, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let config = &workspace.config;
    let env = workspace.environment()?;
    let target = config.target(env)?;
    let keep = options.keep.unwrap_or_else(|| config.retention_keep(env));

    let providers = workspace.providers(&output).await?;

    let current = match &options.current {
        Some(raw) => Some(Version::new(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?),
        None => live_version(&providers.cdn, &target.distribution).await?,
    };
    match &current {
        Some(v) => output.progress(&format!("  → Live version: v{}", v)),
        None => output.warning("distribution does not point at a version, keeping the most recent ones"),
    }

    let selector: Box<dyn PruneSelector> = if workspace.interactive {
        Box::new(InteractiveSelect)
    } else {
        Box::new(AutoSelect)
    };

    let outcome = edgeship::prune::prune(
        &providers.storage,
        &target,
        current.as_ref(),
        keep,
        selector.as_ref(),
    )
    .await?;
    diag.record_prune(&outcome);

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match outcome {
        PruneOutcome::Skipped { .. } => output.success("Nothing pruned"),
        PruneOutcome::NothingSelected { excluded } => output.success(&format!(
            "Nothing pruned ({} versions kept)",
            excluded.len()
        )),
        PruneOutcome::Pruned { excluded, deleted } => {
            for version in &deleted {
                output.detail("deleted", &format!("v{}", version));
            }
            output.success(&format!(
                "Pruned {} versions ({} kept)",
                deleted.len(),
                excluded.len()
            ))
        }
    }

    Ok(())
}
