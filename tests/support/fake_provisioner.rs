// ABOUTME: Scripted stack provisioner for state machine tests.
// ABOUTME: Replays a queue of describe results and records mutating calls.

use async_trait::async_trait;
use edgeship::provider::{
    CreateStack, ProvisionError, Provisioner, StackDescription, StackOutput, UpdateOutcome,
    UpdateStack,
};
use edgeship::types::{StackId, StackName};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// A describe result: `None` means the stack does not exist.
pub type Step = Option<&'static str>;

#[derive(Default)]
pub struct ScriptedProvisioner {
    /// Popped on every describe; the last entry repeats.
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Step>,
    outputs: Vec<StackOutput>,
    template_error: Option<String>,
    no_changes: bool,
    describes: Mutex<usize>,
    creates: Mutex<Vec<CreateStack>>,
    updates: Mutex<Vec<UpdateStack>>,
}

impl ScriptedProvisioner {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn with_outputs(mut self, outputs: &[(&str, &str)]) -> Self {
        self.outputs = outputs
            .iter()
            .map(|(k, v)| StackOutput {
                key: k.to_string(),
                value: v.to_string(),
                description: None,
            })
            .collect();
        self
    }

    pub fn rejecting_template(mut self, reason: &str) -> Self {
        self.template_error = Some(reason.to_string());
        self
    }

    pub fn with_no_changes(mut self) -> Self {
        self.no_changes = true;
        self
    }

    pub fn describe_count(&self) -> usize {
        *self.describes.lock()
    }

    pub fn creates(&self) -> Vec<CreateStack> {
        self.creates.lock().clone()
    }

    pub fn updates(&self) -> Vec<UpdateStack> {
        self.updates.lock().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock();
        let mut last = self.last.lock();
        if let Some(step) = steps.pop_front() {
            *last = step;
        }
        *last
    }
}

#[async_trait]
impl Provisioner for ScriptedProvisioner {
    async fn describe_stack(
        &self,
        name: &StackName,
    ) -> Result<Option<StackDescription>, ProvisionError> {
        *self.describes.lock() += 1;
        Ok(self.next_step().map(|status| StackDescription {
            name: name.to_string(),
            status: status.to_string(),
            status_reason: status
                .contains("ROLLBACK")
                .then(|| "Resource creation cancelled".to_string()),
            parameters: BTreeMap::new(),
            outputs: self.outputs.clone(),
        }))
    }

    async fn validate_template(&self, _body: &str) -> Result<(), ProvisionError> {
        match &self.template_error {
            Some(reason) => Err(ProvisionError::TemplateInvalid(reason.clone())),
            None => Ok(()),
        }
    }

    async fn create_stack(&self, request: &CreateStack) -> Result<StackId, ProvisionError> {
        self.creates.lock().push(request.clone());
        Ok(StackId::new(format!("arn:stack/{}", request.name)))
    }

    async fn update_stack(&self, request: &UpdateStack) -> Result<UpdateOutcome, ProvisionError> {
        self.updates.lock().push(request.clone());
        if self.no_changes {
            return Ok(UpdateOutcome::NoChanges);
        }
        Ok(UpdateOutcome::Started(StackId::new(format!(
            "arn:stack/{}",
            request.name
        ))))
    }
}

/// Sleeper that records requested durations and returns at once.
#[derive(Default)]
pub struct InstantSleeper {
    pub slept: Mutex<Vec<Duration>>,
}

#[async_trait]
impl edgeship::stack::Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Sleeper that never wakes, so only cancellation can end a poll.
pub struct StuckSleeper;

#[async_trait]
impl edgeship::stack::Sleeper for StuckSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}
