//! [`StackProvider`] backed by the AWS SDK for CloudFormation, plus S3
//! downloads for templates.
//!
//! The SDK is async; every call here blocks on a current-thread runtime owned
//! by [`AwsProvider`]. Retries with exponential backoff are configured once on
//! the SDK client.

use std::error::Error as StdError;

use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::create_stack::CreateStackError;
use aws_sdk_cloudformation::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudformation::types::{
    Capability, Parameter, ResourceStatus, Stack as AwsStack, StackEvent, StackResource,
    StackStatus, Tag,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use sfm_core::config::{MAX_LIST_PAGES, MAX_RETRY_ATTEMPTS, MAX_RETRY_BACKOFF};
use sfm_core::error::Result;
use sfm_core::provider::{
    CreateRequest, ProviderError, ProviderResult, StackProvider, UpdateRequest,
};
use sfm_core::stack::{Event, Resource, Stack};
use tokio::runtime::{Builder, Runtime};

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn time(value: Option<&AwsDateTime>) -> Option<DateTime<Utc>> {
    value.and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
}

/// The service message, prefixed with its error code when there is one.
fn remote<E>(error: &SdkError<E>) -> ProviderError
where
    E: ProvideErrorMetadata + StdError + 'static,
{
    let service = error.as_service_error();
    match (service.and_then(|e| e.code()), service.and_then(|e| e.message())) {
        (Some(code), Some(message)) => ProviderError::Remote(format!("{code}: {message}")),
        (None, Some(message)) => ProviderError::Remote(message.to_string()),
        _ => ProviderError::Remote(DisplayErrorContext(error).to_string()),
    }
}

/// Like [`remote`], but recognizes the validation error for a missing stack.
fn missing_or_remote<E>(name: &str, error: &SdkError<E>) -> ProviderError
where
    E: ProvideErrorMetadata + StdError + 'static,
{
    let missing = error
        .as_service_error()
        .and_then(|e| e.message())
        .is_some_and(|message| message.contains("does not exist"));

    if missing {
        ProviderError::NotFound(name.to_string())
    } else {
        remote(error)
    }
}

fn key_values<'a, I>(pairs: I) -> std::collections::BTreeMap<String, String>
where
    I: Iterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    pairs
        .filter_map(|(key, value)| {
            key.map(|key| (key.to_string(), value.unwrap_or_default().to_string()))
        })
        .collect()
}

fn convert_stack(aws: &AwsStack) -> Stack {
    let status = aws
        .stack_status()
        .map(StackStatus::as_str)
        .unwrap_or_default();

    let mut stack = Stack::new(text(aws.stack_name()), status);
    stack.reason = text(aws.stack_status_reason());
    stack.description = text(aws.description());
    stack.disable_rollback = aws.disable_rollback().unwrap_or_default();
    stack.termination_protection = aws.enable_termination_protection().unwrap_or_default();
    stack.capabilities = aws
        .capabilities()
        .iter()
        .map(|capability| capability.as_str().to_string())
        .collect();
    stack.notification_topics = aws.notification_arns().to_vec();
    stack.parameters = key_values(
        aws
            .parameters()
            .iter()
            .map(|p| (p.parameter_key(), p.parameter_value())),
    );
    stack.outputs = key_values(
        aws
            .outputs()
            .iter()
            .map(|o| (o.output_key(), o.output_value())),
    );
    stack.tags = key_values(aws.tags().iter().map(|t| (t.key(), t.value())));
    stack.created = time(aws.creation_time());
    stack.updated = time(aws.last_updated_time());
    stack
}

fn convert_event(aws: &StackEvent) -> Option<Event> {
    Some(Event {
        id: text(aws.event_id()),
        resource: text(aws.logical_resource_id()),
        status: aws
            .resource_status()
            .map(ResourceStatus::as_str)
            .unwrap_or_default()
            .to_string(),
        reason: text(aws.resource_status_reason()),
        timestamp: time(aws.timestamp())?,
        token: aws.client_request_token().map(ToString::to_string),
    })
}

fn convert_resource(aws: &StackResource) -> Resource {
    Resource {
        logical_id: text(aws.logical_resource_id()),
        physical_id: text(aws.physical_resource_id()),
        resource_type: text(aws.resource_type()),
        status: aws
            .resource_status()
            .map(ResourceStatus::as_str)
            .unwrap_or_default()
            .to_string(),
        reason: text(aws.resource_status_reason()),
        updated: time(aws.timestamp()),
    }
}

fn parameters(values: &IndexMap<String, String>) -> Vec<Parameter> {
    values
        .iter()
        .map(|(key, value)| {
            Parameter::builder()
                .parameter_key(key)
                .parameter_value(value)
                .build()
        })
        .collect()
}

fn tags(values: &IndexMap<String, String>) -> ProviderResult<Vec<Tag>> {
    Ok(values
        .iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect())
}

fn capabilities(names: &[String]) -> Vec<Capability> {
    names.iter().map(|name| Capability::from(name.as_str())).collect()
}

pub struct AwsProvider {
    runtime: Runtime,
    cloudformation: aws_sdk_cloudformation::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsProvider {
    /// Loads credentials from the default chain and builds the clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the async runtime cannot be started.
    pub fn connect(region: &str) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let retry = RetryConfig::standard()
            .with_max_attempts(MAX_RETRY_ATTEMPTS)
            .with_max_backoff(MAX_RETRY_BACKOFF);
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .retry_config(retry)
                .load(),
        );
        debug!("Loaded AWS configuration for region `{region}`");

        Ok(Self {
            cloudformation: aws_sdk_cloudformation::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
            runtime,
        })
    }

    /// Downloads an S3 object.
    ///
    /// # Errors
    ///
    /// Returns the SDK error text if the object cannot be read.
    pub fn fetch_object(&self, bucket: &str, key: &str) -> std::result::Result<Vec<u8>, String> {
        self.runtime.block_on(async {
            let object = self
                .s3
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| aws_sdk_s3::error::DisplayErrorContext(&e).to_string())?;

            let body = object.body.collect().await.map_err(|e| e.to_string())?;
            Ok(body.into_bytes().to_vec())
        })
    }
}

impl StackProvider for AwsProvider {
    fn describe(&self, name: &str) -> ProviderResult<Stack> {
        let output = self
            .runtime
            .block_on(self.cloudformation.describe_stacks().stack_name(name).send())
            .map_err(|e| missing_or_remote(name, &e))?;

        output
            .stacks()
            .first()
            .map(convert_stack)
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    fn create(&self, request: &CreateRequest) -> ProviderResult<()> {
        let mut create = self
            .cloudformation
            .create_stack()
            .stack_name(&request.name)
            .template_body(&request.template_body)
            .set_parameters(Some(parameters(&request.parameters)))
            .set_tags(Some(tags(&request.tags)?))
            .set_capabilities(Some(capabilities(&request.capabilities)))
            .disable_rollback(request.disable_rollback)
            .client_request_token(&request.token);
        if !request.notification_topics.is_empty() {
            create = create.set_notification_arns(Some(request.notification_topics.clone()));
        }

        self.runtime
            .block_on(create.send())
            .map(|_| ())
            .map_err(|e| {
                if e
                    .as_service_error()
                    .is_some_and(CreateStackError::is_already_exists_exception)
                {
                    ProviderError::AlreadyExists(request.name.clone())
                } else {
                    remote(&e)
                }
            })
    }

    fn update(&self, request: &UpdateRequest) -> ProviderResult<()> {
        let mut update = self
            .cloudformation
            .update_stack()
            .stack_name(&request.name)
            .template_body(&request.template_body)
            .set_parameters(Some(parameters(&request.parameters)))
            .set_tags(Some(tags(&request.tags)?))
            .set_capabilities(Some(capabilities(&request.capabilities)))
            .client_request_token(&request.token);
        // an empty list would clear the stack's existing topics
        if !request.notification_topics.is_empty() {
            update = update.set_notification_arns(Some(request.notification_topics.clone()));
        }

        self.runtime
            .block_on(update.send())
            .map(|_| ())
            .map_err(|e| missing_or_remote(&request.name, &e))
    }

    fn delete(&self, name: &str, token: &str) -> ProviderResult<()> {
        self.runtime
            .block_on(
                self.cloudformation
                    .delete_stack()
                    .stack_name(name)
                    .client_request_token(token)
                    .send(),
            )
            .map(|_| ())
            .map_err(|e| remote(&e))
    }

    fn events(&self, name: &str) -> ProviderResult<Vec<Event>> {
        let output = self
            .runtime
            .block_on(
                self.cloudformation
                    .describe_stack_events()
                    .stack_name(name)
                    .send(),
            )
            .map_err(|e| missing_or_remote(name, &e))?;

        Ok(output.stack_events().iter().filter_map(convert_event).collect())
    }

    fn list(&self) -> ProviderResult<Vec<Stack>> {
        self.runtime.block_on(async {
            let mut stacks = Vec::new();
            let mut next_token: Option<String> = None;

            for page in 1..=MAX_LIST_PAGES {
                let output = self
                    .cloudformation
                    .describe_stacks()
                    .set_next_token(next_token.take())
                    .send()
                    .await
                    .map_err(|e| remote(&e))?;

                stacks.extend(output.stacks().iter().map(convert_stack));
                next_token = output.next_token().map(ToString::to_string);
                if next_token.is_none() {
                    break;
                }
                if page == MAX_LIST_PAGES {
                    debug!("Stopped listing stacks after {MAX_LIST_PAGES} pages");
                }
            }

            Ok::<_, ProviderError>(stacks)
        })
    }

    fn resources(&self, name: &str) -> ProviderResult<Vec<Resource>> {
        let output = self
            .runtime
            .block_on(
                self.cloudformation
                    .describe_stack_resources()
                    .stack_name(name)
                    .send(),
            )
            .map_err(|e| missing_or_remote(name, &e))?;

        Ok(output.stack_resources().iter().map(convert_resource).collect())
    }
}
