//! Create-or-update and delete logic for a named stack.
//!
//! [`Orchestrator::make_or_update`] describes the stack once and picks a
//! branch:
//!
//! - not found: create it
//! - left behind by a failed create: delete it, wait for the delete, create it
//! - otherwise: update it, carrying forward stored parameter values
//!
//! Every submission carries a fresh client request token so retries inside
//! the provider cannot apply an operation twice.

use std::collections::BTreeMap;
use std::io::{self, Write};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_CAPABILITIES;
use crate::error::{Action, Error, Result};
use crate::filter::NameFilter;
use crate::provider::{CreateRequest, ProviderError, StackProvider, UpdateRequest};
use crate::reconcile::{reconcile_parameters, reconcile_tags, KeyValues, Sources};
use crate::render::RenderConfig;
use crate::stack::{Resource, Stack};
use crate::status::is_failed_create;
use crate::template::Template;
use crate::wait::{RenderMode, WaitSettings, Waiter};

/// Everything needed to create or update one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeRequest {
    pub name: String,
    pub template: Template,
    pub parameters: Sources,
    pub tags: Sources,
    pub notification_topics: Vec<String>,
    pub disable_rollback: bool,
}

/// What [`Orchestrator::make_or_update`] did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    /// Deleted after a failed create, then created again.
    Recreated,
    Updated,
    /// The update was accepted as a no-op by the remote side.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub name: String,
    pub token: String,
    pub change: Change,
}

fn new_token() -> String {
    Uuid::new_v4().to_string()
}

fn log_parameters(parameters: &KeyValues) {
    for (key, value) in parameters {
        debug!("param {key}={value}");
    }
}

pub struct Orchestrator<P> {
    provider: P,
    wait: WaitSettings,
    render: RenderConfig,
    capabilities: Vec<String>,
}

impl<P: StackProvider> Orchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            wait: WaitSettings::default(),
            render: RenderConfig::default(),
            capabilities: DEFAULT_CAPABILITIES.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_wait_settings(mut self, wait: WaitSettings) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn waiter(&self) -> Waiter<'_, P> {
        Waiter::new(&self.provider, self.wait, self.render)
    }

    /// Creates the stack if it does not exist, updates it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or template is empty (before any remote call)
    /// - Describing the stack fails for a reason other than it not existing
    /// - A stack left behind by a failed create cannot be deleted
    /// - The create or update is rejected, other than as a no-op update
    pub fn make_or_update(&self, request: &MakeRequest) -> Result<Outcome> {
        let name = request.name.as_str();
        if name.is_empty() {
            return Err(Error::MissingStackName);
        }
        if request.template.is_empty() {
            return Err(Error::EmptyTemplate(name.to_string()));
        }

        let tags = reconcile_tags(&request.tags);

        match self.provider.describe(name) {
            Err(ProviderError::NotFound(_)) => self.create(request, &tags, Change::Created),
            Err(source) => Err(Error::provider(Action::Describe, name, source)),
            Ok(stack) if is_failed_create(stack.status()) => {
                self.recover(&stack)?;
                self.create(request, &tags, Change::Recreated)
            }
            Ok(stack) => self.update(request, &tags, Some(&stack.parameters)),
        }
    }

    fn create(&self, request: &MakeRequest, tags: &KeyValues, change: Change) -> Result<Outcome> {
        let name = request.name.as_str();
        let parameters = reconcile_parameters(&request.parameters, &request.template, None);
        log_parameters(&parameters);

        let create = CreateRequest {
            name: name.to_string(),
            template_body: request.template.body().to_string(),
            parameters,
            tags: tags.clone(),
            capabilities: self.capabilities.clone(),
            notification_topics: request.notification_topics.clone(),
            disable_rollback: request.disable_rollback,
            token: new_token(),
        };

        info!("Creating stack `{name}`");
        match self.provider.create(&create) {
            Ok(()) => Ok(Outcome {
                name: name.to_string(),
                token: create.token,
                change,
            }),
            Err(ProviderError::AlreadyExists(_)) => {
                warn!("Stack `{name}` was created concurrently, updating it instead");
                let winner = self
                    .provider
                    .describe(name)
                    .map_err(|source| Error::provider(Action::Describe, name, source))?;
                self.update(request, tags, Some(&winner.parameters))
            }
            Err(source) => Err(Error::provider(Action::Create, name, source)),
        }
    }

    fn update(
        &self,
        request: &MakeRequest,
        tags: &KeyValues,
        previous: Option<&BTreeMap<String, String>>,
    ) -> Result<Outcome> {
        let name = request.name.as_str();
        let parameters = reconcile_parameters(&request.parameters, &request.template, previous);
        log_parameters(&parameters);

        let update = UpdateRequest {
            name: name.to_string(),
            template_body: request.template.body().to_string(),
            parameters,
            tags: tags.clone(),
            capabilities: self.capabilities.clone(),
            notification_topics: request.notification_topics.clone(),
            token: new_token(),
        };

        info!("Updating stack `{name}`");
        let change = match self.provider.update(&update) {
            Ok(()) => Change::Updated,
            Err(e) if e.is_no_op_update() => {
                info!("No update required for stack `{name}`");
                Change::Unchanged
            }
            Err(source) => return Err(Error::provider(Action::Update, name, source)),
        };

        Ok(Outcome {
            name: name.to_string(),
            token: update.token,
            change,
        })
    }

    /// Deletes a stack stuck after a failed create and waits for the delete.
    fn recover(&self, stack: &Stack) -> Result<()> {
        warn!(
            "Stack `{}` is in {} state, deleting it before creating it again",
            stack.name,
            stack.status()
        );

        let failed = |cause: Error| Error::RecoveryFailed {
            stack: stack.name.clone(),
            status: stack.status().to_string(),
            cause: Box::new(cause),
        };

        self.remove(&stack.name).map_err(failed)?;
        self.waiter()
            .block(&stack.name, RenderMode::None, &mut io::sink())
            .map_err(failed)
    }

    /// Submits a delete and returns its client request token.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the delete is rejected.
    pub fn remove(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::MissingStackName);
        }

        let token = new_token();
        info!("Deleting stack `{name}`");
        self.provider
            .delete(name, &token)
            .map_err(|source| Error::provider(Action::Delete, name, source))?;

        Ok(token)
    }

    /// Blocks until the stack's current operation finishes.
    ///
    /// # Errors
    ///
    /// See [`Waiter::block`].
    pub fn await_completion(&self, name: &str, mode: RenderMode, out: &mut dyn Write) -> Result<()> {
        if name.is_empty() {
            return Err(Error::MissingStackName);
        }
        self.waiter().block(name, mode, out)
    }

    /// # Errors
    ///
    /// Returns an error if the stack cannot be described.
    pub fn get(&self, name: &str) -> Result<Stack> {
        self.provider
            .describe(name)
            .map_err(|source| Error::provider(Action::Describe, name, source))
    }

    /// Stacks whose names match `filter`, in provider order.
    ///
    /// # Errors
    ///
    /// Returns an error if the stacks cannot be listed.
    pub fn list(&self, filter: &NameFilter) -> Result<Vec<Stack>> {
        let stacks = self
            .provider
            .list()
            .map_err(|source| Error::provider(Action::List, filter.glob(), source))?;

        Ok(stacks
            .into_iter()
            .filter(|stack| filter.matches(&stack.name))
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the resources cannot be read.
    pub fn resources(&self, name: &str) -> Result<Vec<Resource>> {
        self.provider
            .resources(name)
            .map_err(|source| Error::provider(Action::ListResources, name, source))
    }
}
