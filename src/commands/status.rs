// ABOUTME: Status command implementation.
// ABOUTME: Shows the live version, stored versions, and stack status.

use edgeship::error::Result;
use edgeship::output::Output;
use edgeship::provider::CdnOps;
use edgeship::prune::list_versions;
use edgeship::release::live_version;
use edgeship::stack::StackMachine;

use super::Workspace;

pub async fn status(workspace: &Workspace, output: Output) -> Result<()> {
    let config = &workspace.config;
    let env = workspace.environment()?;
    let target = config.target(env)?;
    let providers = workspace.providers(&output).await?;

    output.detail("environment", &env.name);
    output.detail("bucket", target.bucket.as_str());

    let summary = providers.cdn.get_distribution(&target.distribution).await?;
    output.detail("distribution", summary.id.as_str());
    output.detail("domain", &summary.domain_name);
    if !summary.aliases.is_empty() {
        output.detail("aliases", &summary.aliases.join(", "));
    }
    output.detail("distribution status", &summary.status);

    let live = live_version(&providers.cdn, &target.distribution).await?;
    output.detail(
        "live version",
        &live.as_ref().map(|v| format!("v{v}")).unwrap_or_else(|| "-".to_string()),
    );

    let versions = list_versions(&providers.storage, &target).await?;
    let listed: Vec<String> = versions
        .iter()
        .map(|v| {
            if live.as_ref() == Some(v) {
                format!("v{v} (live)")
            } else {
                format!("v{v}")
            }
        })
        .collect();
    output.detail("stored versions", &listed.join(", "));

    let stack = StackMachine::new(&providers.provisioner, config.stack_name(env)?);
    let stack_status = stack.describe().await?;
    output.detail(&format!("stack {}", stack.name()), stack_status.as_str());

    Ok(())
}
