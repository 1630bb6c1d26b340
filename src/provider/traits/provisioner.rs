// ABOUTME: Infrastructure provisioning operations trait.
// ABOUTME: Describe, validate, create, and update stacks.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::types::{StackId, StackName};

/// Stack provisioning operations.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Describe a stack. Returns `None` when the stack does not exist.
    async fn describe_stack(
        &self,
        name: &StackName,
    ) -> Result<Option<StackDescription>, ProvisionError>;

    /// Check a template body for structural errors.
    async fn validate_template(&self, body: &str) -> Result<(), ProvisionError>;

    async fn create_stack(&self, request: &CreateStack) -> Result<StackId, ProvisionError>;

    async fn update_stack(&self, request: &UpdateStack) -> Result<UpdateOutcome, ProvisionError>;
}

/// Stack state as reported by the provider.
#[derive(Debug, Clone)]
pub struct StackDescription {
    pub name: String,
    /// Raw provider status, e.g. `CREATE_IN_PROGRESS`.
    pub status: String,
    pub status_reason: Option<String>,
    pub parameters: BTreeMap<String, String>,
    pub outputs: Vec<StackOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateStack {
    pub name: StackName,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub termination_protection: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateStack {
    pub name: StackName,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
}

/// Result of an accepted update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update was accepted and is now in progress.
    Started(StackId),
    /// The template and parameters match what is deployed.
    NoChanges,
}

/// Errors from provisioning operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProvisionError {
    #[error("template invalid: {0}")]
    TemplateInvalid(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("provisioning service unavailable: {0}")]
    Unavailable(String),
}
