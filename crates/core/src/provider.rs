//! The remote stack-management API, as seen by the orchestrator.
//!
//! Implementations own credentials, region and transport, including any
//! retry with backoff. Callers in this crate never retry a provider call
//! themselves.

use indexmap::IndexMap;
use thiserror::Error;

use crate::stack::{Event, Resource, Stack};

/// Suffix of the remote message returned for an update that changes nothing.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("stack `{}` does not exist", .0)]
    NotFound(String),

    #[error("stack `{}` already exists", .0)]
    AlreadyExists(String),

    #[error("{}", .0)]
    Remote(String),
}

impl ProviderError {
    /// Whether an update was rejected only because it would change nothing.
    ///
    /// The remote API has no structured signal for this; the message text is
    /// the contract. Keep every such check behind this predicate.
    #[must_use]
    pub fn is_no_op_update(&self) -> bool {
        matches!(self, Self::Remote(message) if message.trim_end().ends_with(NO_UPDATES_MESSAGE))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub template_body: String,
    pub parameters: IndexMap<String, String>,
    pub tags: IndexMap<String, String>,
    pub capabilities: Vec<String>,
    pub notification_topics: Vec<String>,
    pub disable_rollback: bool,
    pub token: String,
}

/// Parameters are always explicit values: carried-forward values are filled
/// in by the reconciler, the remote side is never asked to reuse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub name: String,
    pub template_body: String,
    pub parameters: IndexMap<String, String>,
    pub tags: IndexMap<String, String>,
    pub capabilities: Vec<String>,
    pub notification_topics: Vec<String>,
    pub token: String,
}

pub trait StackProvider {
    /// # Errors
    ///
    /// [`ProviderError::NotFound`] when no stack has this name.
    fn describe(&self, name: &str) -> ProviderResult<Stack>;

    /// # Errors
    ///
    /// [`ProviderError::AlreadyExists`] when a stack with this name exists.
    fn create(&self, request: &CreateRequest) -> ProviderResult<()>;

    /// # Errors
    ///
    /// Any rejection, including the "no updates" one, see
    /// [`ProviderError::is_no_op_update`].
    fn update(&self, request: &UpdateRequest) -> ProviderResult<()>;

    /// # Errors
    ///
    /// Any rejection of the delete request.
    fn delete(&self, name: &str, token: &str) -> ProviderResult<()>;

    /// Event history of a stack, in whatever order the provider returns it.
    ///
    /// # Errors
    ///
    /// Any failure to read the history.
    fn events(&self, name: &str) -> ProviderResult<Vec<Event>>;

    /// Every stack visible to the session, across all pages.
    ///
    /// # Errors
    ///
    /// Any failure to read a page.
    fn list(&self) -> ProviderResult<Vec<Stack>>;

    /// # Errors
    ///
    /// Any failure to read the resources.
    fn resources(&self, name: &str) -> ProviderResult<Vec<Resource>>;
}

impl<P: StackProvider + ?Sized> StackProvider for &P {
    fn describe(&self, name: &str) -> ProviderResult<Stack> {
        (**self).describe(name)
    }

    fn create(&self, request: &CreateRequest) -> ProviderResult<()> {
        (**self).create(request)
    }

    fn update(&self, request: &UpdateRequest) -> ProviderResult<()> {
        (**self).update(request)
    }

    fn delete(&self, name: &str, token: &str) -> ProviderResult<()> {
        (**self).delete(name, token)
    }

    fn events(&self, name: &str) -> ProviderResult<Vec<Event>> {
        (**self).events(name)
    }

    fn list(&self) -> ProviderResult<Vec<Stack>> {
        (**self).list()
    }

    fn resources(&self, name: &str) -> ProviderResult<Vec<Resource>> {
        (**self).resources(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_op_update_detection() {
        let no_op = ProviderError::Remote(
            "ValidationError: No updates are to be performed.".to_string(),
        );
        assert!(no_op.is_no_op_update());

        let with_newline = ProviderError::Remote("No updates are to be performed.\n".to_string());
        assert!(with_newline.is_no_op_update());

        let other = ProviderError::Remote("Template format error".to_string());
        assert!(!other.is_no_op_update());

        let not_remote = ProviderError::NotFound(NO_UPDATES_MESSAGE.to_string());
        assert!(!not_remote.is_no_op_update());
    }
}
