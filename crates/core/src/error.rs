use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::provider::ProviderError;
use crate::status::Phase;

pub type Result<T> = std::result::Result<T, Error>;

/// The remote operation that was being attempted when a provider call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Describe,
    Create,
    Update,
    Delete,
    List,
    ListEvents,
    ListResources,
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Action::Describe => "describe",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
            Action::ListEvents => "list events of",
            Action::ListResources => "list resources of",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing stack name")]
    MissingStackName,

    #[error("Stack `{}` has an empty template", .0)]
    EmptyTemplate(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Cannot parse template: {}", .0)]
    Template(serde_yaml::Error),

    #[error("Cannot read template from `{}`: {}", .location, .reason)]
    TemplateSource { location: String, reason: String },

    #[error("The {} file at `{}` must be a mapping of keys to values", .file_description, .path)]
    NotAMapping {
        file_description: String,
        path: String,
    },

    #[error(
        "Unsupported value for key `{}` in {} file at `{}`: expected a string, a bool or a list of them",
        .key, .file_description, .path
    )]
    UnsupportedValue {
        key: String,
        file_description: String,
        path: String,
    },

    #[error("Invalid stack name glob `{}`: {}", .0, .1)]
    Glob(String, regex::Error),

    #[error("No region set: pass `--region` or set AWS_REGION / AWS_DEFAULT_REGION")]
    MissingRegion,

    #[error("{}", .0)]
    Usage(String),

    #[error("Cannot encode {} as {}: {}", .what, .encoding, .reason)]
    Encode {
        what: String,
        encoding: String,
        reason: String,
    },

    #[error("Cannot {} stack `{}`: {}", .action, .stack, .source)]
    Provider {
        action: Action,
        stack: String,
        #[source]
        source: ProviderError,
    },

    #[error("Stack `{}` is in {} state and could not be removed: {}", .stack, .status, .cause)]
    RecoveryFailed {
        stack: String,
        status: String,
        #[source]
        cause: Box<Error>,
    },

    #[error("Stack `{}` status is not ok: {} ({})", .stack, .status, .phase)]
    StackFailed {
        stack: String,
        status: String,
        phase: Phase,
    },

    #[error("Timed out waiting on stack `{}` after {} polls", .stack, .polls)]
    Timeout { stack: String, polls: u32 },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn provider(action: Action, stack: &str, source: ProviderError) -> Self {
        Self::Provider {
            action,
            stack: stack.to_string(),
            source,
        }
    }

    /// True when waiting gave up, as opposed to the stack reporting a failure.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True for problems with local input, raised before any remote call.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingStackName
                | Self::EmptyTemplate(_)
                | Self::Yaml { .. }
                | Self::Io { .. }
                | Self::Template(_)
                | Self::NotAMapping { .. }
                | Self::UnsupportedValue { .. }
                | Self::Glob(_, _)
        )
    }
}
