// ABOUTME: CloudFormation-backed stack provisioning.
// ABOUTME: Translates missing-stack and no-op update responses into typed outcomes.

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types::{Capability, Parameter, Stack};
use std::fmt::Debug;

use super::service_error;
use crate::provider::traits::{
    CreateStack, ProvisionError, Provisioner, StackDescription, StackOutput, StackParameter,
    UpdateOutcome, UpdateStack,
};
use crate::types::{StackId, StackName};

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Error codes meaning the request itself was refused, as opposed to an outage.
const REJECTION_CODES: [&str; 3] = [
    "ValidationError",
    "AlreadyExistsException",
    "InsufficientCapabilitiesException",
];

fn map_provision_error<E, R>(err: SdkError<E, R>, stack: &str) -> ProvisionError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match service_error(&err) {
        Some((code, message)) if REJECTION_CODES.contains(&code) => {
            ProvisionError::Rejected(format!("{stack}: {message}"))
        }
        _ => ProvisionError::Unavailable(format!("{stack}: {}", DisplayErrorContext(&err))),
    }
}

fn is_missing_stack<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    matches!(
        service_error(err),
        Some(("ValidationError", message)) if message.contains("does not exist")
    )
}

fn is_no_op_update<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    matches!(
        service_error(err),
        Some(("ValidationError", message)) if message.contains("No updates are to be performed")
    )
}

fn to_sdk_parameters(parameters: &[StackParameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|p| {
            Parameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn to_description(stack: &Stack) -> StackDescription {
    StackDescription {
        name: stack.stack_name().unwrap_or_default().to_owned(),
        status: stack
            .stack_status()
            .map(|s| s.as_str().to_owned())
            .unwrap_or_default(),
        status_reason: stack.stack_status_reason().map(str::to_owned),
        parameters: stack
            .parameters()
            .iter()
            .filter_map(|p| {
                Some((
                    p.parameter_key()?.to_owned(),
                    p.parameter_value().unwrap_or_default().to_owned(),
                ))
            })
            .collect(),
        outputs: stack
            .outputs()
            .iter()
            .filter_map(|o| {
                Some(StackOutput {
                    key: o.output_key()?.to_owned(),
                    value: o.output_value().unwrap_or_default().to_owned(),
                    description: o.description().map(str::to_owned),
                })
            })
            .collect(),
    }
}

// =============================================================================
// CloudFormationProvisioner
// =============================================================================

/// Stack provisioning backed by a CloudFormation client.
#[derive(Debug, Clone)]
pub struct CloudFormationProvisioner {
    client: Client,
}

impl CloudFormationProvisioner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provisioner for CloudFormationProvisioner {
    async fn describe_stack(
        &self,
        name: &StackName,
    ) -> Result<Option<StackDescription>, ProvisionError> {
        match self
            .client
            .describe_stacks()
            .stack_name(name.as_str())
            .send()
            .await
        {
            Ok(output) => Ok(output.stacks().first().map(to_description)),
            Err(e) if is_missing_stack(&e) => Ok(None),
            Err(e) => Err(map_provision_error(e, name.as_str())),
        }
    }

    async fn validate_template(&self, body: &str) -> Result<(), ProvisionError> {
        match self.client.validate_template().template_body(body).send().await {
            Ok(_) => Ok(()),
            Err(e) => match service_error(&e) {
                Some(("ValidationError", message)) => {
                    Err(ProvisionError::TemplateInvalid(message.to_owned()))
                }
                _ => Err(ProvisionError::Unavailable(
                    DisplayErrorContext(&e).to_string(),
                )),
            },
        }
    }

    async fn create_stack(&self, request: &CreateStack) -> Result<StackId, ProvisionError> {
        tracing::debug!(stack = %request.name, "creating stack");

        let output = self
            .client
            .create_stack()
            .stack_name(request.name.as_str())
            .template_body(&request.template_body)
            .set_parameters(Some(to_sdk_parameters(&request.parameters)))
            .enable_termination_protection(request.termination_protection)
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam)
            .send()
            .await
            .map_err(|e| map_provision_error(e, request.name.as_str()))?;

        Ok(StackId::new(
            output.stack_id().unwrap_or(request.name.as_str()),
        ))
    }

    async fn update_stack(&self, request: &UpdateStack) -> Result<UpdateOutcome, ProvisionError> {
        tracing::debug!(stack = %request.name, "updating stack");

        let result = self
            .client
            .update_stack()
            .stack_name(request.name.as_str())
            .template_body(&request.template_body)
            .set_parameters(Some(to_sdk_parameters(&request.parameters)))
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam)
            .send()
            .await;

        match result {
            Ok(output) => Ok(UpdateOutcome::Started(StackId::new(
                output.stack_id().unwrap_or(request.name.as_str()),
            ))),
            Err(e) if is_no_op_update(&e) => Ok(UpdateOutcome::NoChanges),
            Err(e) => Err(map_provision_error(e, request.name.as_str())),
        }
    }
}
