// ABOUTME: Provisioning state machine driving stack create/update to a terminal status.
// ABOUTME: Explicit poll loop over an injectable, cancellable sleep.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::{StackError, StackParameters, StackStatus};
use crate::provider::{CreateStack, Provisioner, StackOutput, UpdateOutcome, UpdateStack};
use crate::types::{StackId, StackName};

/// Interval between stack status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timer used between polls. Tests inject an instant one.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for &T {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Accepted change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(StackId),
    Updated(StackId),
    /// Template and parameters already match; nothing to wait for.
    NoChanges,
}

/// Terminal result of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded {
        status: StackStatus,
        outputs: Vec<StackOutput>,
    },
    Failed {
        status: String,
        reason: Option<String>,
    },
}

/// Drives one named stack through the provider.
pub struct StackMachine<'a, P: ?Sized, S = TokioSleeper> {
    provisioner: &'a P,
    name: StackName,
    interval: Duration,
    termination_protection: bool,
    sleeper: S,
}

impl<'a, P: Provisioner + ?Sized> StackMachine<'a, P, TokioSleeper> {
    pub fn new(provisioner: &'a P, name: StackName) -> Self {
        Self {
            provisioner,
            name,
            interval: DEFAULT_POLL_INTERVAL,
            termination_protection: true,
            sleeper: TokioSleeper,
        }
    }
}

impl<'a, P: Provisioner + ?Sized, S: Sleeper> StackMachine<'a, P, S> {
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn termination_protection(mut self, enabled: bool) -> Self {
        self.termination_protection = enabled;
        self
    }

    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> StackMachine<'a, P, T> {
        StackMachine {
            provisioner: self.provisioner,
            name: self.name,
            interval: self.interval,
            termination_protection: self.termination_protection,
            sleeper,
        }
    }

    pub fn name(&self) -> &StackName {
        &self.name
    }

    /// Current status, `Absent` when the stack does not exist.
    pub async fn describe(&self) -> Result<StackStatus, StackError> {
        let description = self
            .provisioner
            .describe_stack(&self.name)
            .await
            .map_err(|e| StackError::from_provider(&self.name, e))?;

        Ok(description
            .map(|d| StackStatus::from_provider(&d.status))
            .unwrap_or(StackStatus::Absent))
    }

    /// Structural template check. Runs before any mutating call.
    pub async fn validate(&self, template: &str) -> Result<(), StackError> {
        self.provisioner
            .validate_template(template)
            .await
            .map_err(|e| StackError::from_provider(&self.name, e))
    }

    /// Create from `Absent`, update from a completed state.
    pub async fn submit(
        &self,
        status: &StackStatus,
        template: &str,
        params: &StackParameters,
    ) -> Result<Submitted, StackError> {
        params.validate()?;
        let parameters = params.to_parameters();

        match status {
            StackStatus::Absent => {
                let request = CreateStack {
                    name: self.name.clone(),
                    template_body: template.to_string(),
                    parameters,
                    termination_protection: self.termination_protection,
                };
                let id = self
                    .provisioner
                    .create_stack(&request)
                    .await
                    .map_err(|e| StackError::from_provider(&self.name, e))?;
                tracing::info!(stack = %self.name, "stack create started");
                Ok(Submitted::Created(id))
            }
            StackStatus::CreateComplete | StackStatus::UpdateComplete => {
                let request = UpdateStack {
                    name: self.name.clone(),
                    template_body: template.to_string(),
                    parameters,
                };
                let outcome = self
                    .provisioner
                    .update_stack(&request)
                    .await
                    .map_err(|e| StackError::from_provider(&self.name, e))?;
                match outcome {
                    UpdateOutcome::Started(id) => {
                        tracing::info!(stack = %self.name, "stack update started");
                        Ok(Submitted::Updated(id))
                    }
                    UpdateOutcome::NoChanges => {
                        tracing::info!(stack = %self.name, "stack already up to date");
                        Ok(Submitted::NoChanges)
                    }
                }
            }
            other => Err(StackError::NotReady {
                stack: self.name.clone(),
                status: other.clone(),
            }),
        }
    }

    /// Describe until the status is terminal.
    ///
    /// No maximum duration; `cancel` resolving ends the wait with
    /// `StackError::Cancelled` and leaves the remote stack alone.
    pub async fn poll<F>(&self, cancel: F) -> Result<PollOutcome, StackError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        loop {
            let description = self
                .provisioner
                .describe_stack(&self.name)
                .await
                .map_err(|e| StackError::from_provider(&self.name, e))?;

            let Some(description) = description else {
                // Disappeared mid-operation, e.g. a failed create was deleted.
                return Ok(PollOutcome::Failed {
                    status: "STACK_NOT_FOUND".to_string(),
                    reason: None,
                });
            };

            let status = StackStatus::from_provider(&description.status);
            tracing::debug!(stack = %self.name, status = %status, "polled stack");

            if status.is_success() {
                return Ok(PollOutcome::Succeeded {
                    status,
                    outputs: description.outputs,
                });
            }
            if let StackStatus::Failed(raw) = status {
                return Ok(PollOutcome::Failed {
                    status: raw,
                    reason: description.status_reason,
                });
            }

            tokio::select! {
                _ = &mut cancel => {
                    tracing::warn!(stack = %self.name, "stop waiting for stack");
                    return Err(StackError::Cancelled { stack: self.name.clone() });
                }
                _ = self.sleeper.sleep(self.interval) => {}
            }
        }
    }

    /// Validate, bring the stack to a stable state, submit, and wait.
    ///
    /// Returns the outputs of the successful stack. A stack already in a
    /// failed state is reported without submitting anything.
    pub async fn setup<F>(
        &self,
        template: &str,
        params: &StackParameters,
        cancel: F,
    ) -> Result<Vec<StackOutput>, StackError>
    where
        F: Future<Output = ()>,
    {
        params.validate()?;
        self.validate(template).await?;

        tokio::pin!(cancel);

        let mut status = self.describe().await?;
        if status.is_in_progress() {
            tracing::info!(stack = %self.name, status = %status, "waiting for running operation");
            status = match self.poll(&mut cancel).await? {
                PollOutcome::Succeeded { status, .. } => status,
                PollOutcome::Failed { status, reason } => {
                    return Err(self.failed(status, reason));
                }
            };
        }
        if let StackStatus::Failed(raw) = &status {
            return Err(self.failed(raw.clone(), None));
        }

        match self.submit(&status, template, params).await? {
            Submitted::NoChanges => self.current_outputs().await,
            Submitted::Created(_) | Submitted::Updated(_) => match self.poll(&mut cancel).await? {
                PollOutcome::Succeeded { outputs, .. } => Ok(outputs),
                PollOutcome::Failed { status, reason } => Err(self.failed(status, reason)),
            },
        }
    }

    async fn current_outputs(&self) -> Result<Vec<StackOutput>, StackError> {
        let description = self
            .provisioner
            .describe_stack(&self.name)
            .await
            .map_err(|e| StackError::from_provider(&self.name, e))?;
        Ok(description.map(|d| d.outputs).unwrap_or_default())
    }

    fn failed(&self, status: String, reason: Option<String>) -> StackError {
        StackError::ProvisioningFailed {
            stack: self.name.clone(),
            status,
            reason,
        }
    }
}
