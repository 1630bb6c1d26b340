// ABOUTME: Error types for stack provisioning.
// ABOUTME: Template, parameter, provider, and cancellation failures with the stack name.

use crate::provider::ProvisionError;
use crate::stack::StackStatus;
use crate::types::StackName;

/// Errors that end a stack setup.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("template for stack {stack} is invalid: {reason}")]
    TemplateInvalid { stack: StackName, reason: String },

    #[error("invalid stack parameters: {0}")]
    InvalidParameters(String),

    #[error("stack {stack} is {status}, cannot submit changes")]
    NotReady {
        stack: StackName,
        status: StackStatus,
    },

    #[error("stack {stack} ended in {status}{}", reason_suffix(.reason))]
    ProvisioningFailed {
        stack: StackName,
        status: String,
        reason: Option<String>,
    },

    #[error("stack {stack} request rejected: {reason}")]
    Rejected { stack: StackName, reason: String },

    #[error("provisioning service unavailable for stack {stack}: {reason}")]
    Unavailable { stack: StackName, reason: String },

    #[error("waiting for stack {stack} was cancelled; the stack itself is unaffected")]
    Cancelled { stack: StackName },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackErrorKind {
    TemplateInvalid,
    InvalidParameters,
    NotReady,
    ProvisioningFailed,
    Unavailable,
    Cancelled,
}

impl StackError {
    pub(crate) fn from_provider(stack: &StackName, err: ProvisionError) -> Self {
        match err {
            ProvisionError::TemplateInvalid(reason) => StackError::TemplateInvalid {
                stack: stack.clone(),
                reason,
            },
            ProvisionError::Rejected(reason) => StackError::Rejected {
                stack: stack.clone(),
                reason,
            },
            ProvisionError::Unavailable(reason) => StackError::Unavailable {
                stack: stack.clone(),
                reason,
            },
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> StackErrorKind {
        match self {
            StackError::TemplateInvalid { .. } => StackErrorKind::TemplateInvalid,
            StackError::InvalidParameters(_) => StackErrorKind::InvalidParameters,
            StackError::NotReady { .. } => StackErrorKind::NotReady,
            StackError::ProvisioningFailed { .. } | StackError::Rejected { .. } => {
                StackErrorKind::ProvisioningFailed
            }
            StackError::Unavailable { .. } => StackErrorKind::Unavailable,
            StackError::Cancelled { .. } => StackErrorKind::Cancelled,
        }
    }
}
