// ABOUTME: Stack command implementation.
// ABOUTME: Creates or updates the environment's stack and waits for the result.

use edgeship::error::{Error, Result};
use edgeship::output::Output;
use edgeship::stack::StackMachine;
use std::path::PathBuf;

use super::Workspace;

pub async fn stack(workspace: &Workspace, template: Option<PathBuf>, mut output: Output) -> Result<()> {
    output.start_timer();

    let config = &workspace.config;
    let env = workspace.environment()?;
    let name = config.stack_name(env)?;
    let params = config.stack_parameters(env)?;

    let template_path = match template {
        Some(path) => config.resolve_path(&path),
        None => config.template_path(),
    };
    let body = std::fs::read_to_string(&template_path).map_err(|source| Error::Template {
        path: template_path.clone(),
        source,
    })?;

    output.progress(&format!(
        "Setting up stack {} from {}",
        name,
        template_path.display()
    ));

    let providers = workspace.providers(&output).await?;
    let machine = StackMachine::new(&providers.provisioner, name.clone())
        .poll_interval(config.stack.poll_interval)
        .termination_protection(config.stack.termination_protection);

    output.progress("  → Waiting for the stack (Ctrl-C stops waiting, the stack keeps going)...");
    let outputs = machine.setup(&body, &params, interrupted()).await?;

    for out in &outputs {
        output.detail(&out.key, &out.value);
    }
    output.success(&format!("Stack {} is ready", name));
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the signal cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
