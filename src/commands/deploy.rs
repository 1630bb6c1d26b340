// ABOUTME: Deploy command implementation.
// ABOUTME: Plans, uploads, and cuts over one version, then optionally prunes.

use edgeship::config::read_package_version;
use edgeship::diagnostics::{Diagnostics, Warning};
use edgeship::error::{Error, Result};
use edgeship::output::Output;
use edgeship::prune::{AutoSelect, PruneOutcome, PruneSelector};
use edgeship::release::{
    InvalidationOutcome, NoProgress, Override, Planned, RedeployPolicy, Release, UploadProgress,
};
use edgeship::types::Version;

use super::Workspace;
use super::prompt::{ConfirmRedeploy, InteractiveSelect, ProgressReporter};

#[derive(Debug, Default)]
pub struct DeployOptions {
    pub version: Option<String>,
    pub force: bool,
    pub no_invalidate: bool,
    pub prune: bool,
}

/// Release the build output as a new version of the selected environment.
pub async fn deploy(workspace: &Workspace, options: DeployOptions, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let config = &workspace.config;
    let env = workspace.environment()?;

    let version = match &options.version {
        Some(raw) => Version::new(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => read_package_version(&config.manifest_path())?,
    };
    let context = config.context(env, version)?;

    output.progress(&format!(
        "Deploying {} v{} to {} ({})",
        context.app, context.version, context.environment, context.target.bucket
    ));

    let providers = workspace.providers(&output).await?;

    let policy: Box<dyn RedeployPolicy> = if options.force {
        Box::new(Override::Always)
    } else if workspace.interactive {
        Box::new(ConfirmRedeploy)
    } else {
        Box::new(Override::Never)
    };

    output.progress("  → Checking for an existing release...");
    let release = Release::<Planned>::plan(&providers.storage, context, policy.as_ref()).await?;
    if release.is_redeploy() {
        diag.warn(Warning::redeploy(format!(
            "version {} was already present and is being uploaded again",
            release.version()
        )));
    }

    let progress: Box<dyn UploadProgress> = if output.is_interactive() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    output.progress("  → Uploading build output...");
    let release = release.upload(&providers.storage, progress.as_ref()).await?;
    output.progress(&format!("  → Uploaded {} files", release.files()));

    output.progress("  → Cutting over distribution...");
    let release = release
        .cutover(&providers.cdn, !options.no_invalidate)
        .await?;
    diag.record_cutover(release.report());

    if let InvalidationOutcome::Requested(id) = &release.report().invalidation {
        output.progress(&format!("  → Invalidation {} requested", id));
    }
    let files = release.files();
    let (context, report) = release.finish();

    if options.prune {
        output.progress("  → Pruning old versions...");
        let selector: Box<dyn PruneSelector> = if workspace.interactive {
            Box::new(InteractiveSelect)
        } else {
            Box::new(AutoSelect)
        };
        let outcome = edgeship::prune::prune(
            &providers.storage,
            &context.target,
            Some(&context.version),
            context.retention_keep,
            selector.as_ref(),
        )
        .await?;

        diag.record_prune(&outcome);
        if let PruneOutcome::Pruned { deleted, .. } = &outcome {
            for version in deleted {
                output.progress(&format!("  → Deleted v{}", version));
            }
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success(&format!(
        "Released v{} to {} ({} files, distribution {})",
        report.version, context.environment, files, report.distribution
    ));
    Ok(())
}
