use indexmap::IndexSet;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Only the parameter keys are read; the rest of the document is passed
/// through untouched to the remote API.
#[derive(Deserialize)]
struct TemplateDocument {
    #[serde(rename = "Parameters", default)]
    parameters: Option<indexmap::IndexMap<String, IgnoredAny>>,
}

/// A stack template: its raw body and the parameter keys it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    declared: IndexSet<String>,
    body: String,
}

impl Template {
    /// Parses a YAML or JSON template body.
    ///
    /// A blank body parses to an empty template; rejecting it is left to the
    /// caller, which knows which stack it was meant for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the body is not a YAML/JSON mapping or its
    /// `Parameters` section is not a mapping.
    pub fn parse(body: impl Into<String>) -> Result<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return Ok(Self {
                declared: IndexSet::new(),
                body,
            });
        }

        let document: TemplateDocument = serde_yaml::from_str(&body).map_err(Error::Template)?;
        let declared = document
            .parameters
            .map(|parameters| parameters.into_keys().collect())
            .unwrap_or_default();

        Ok(Self { declared, body })
    }

    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.declared.contains(key)
    }

    /// Declared parameter keys, in template order.
    #[must_use]
    pub fn declared(&self) -> &IndexSet<String> {
        &self.declared
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
