//! Reading parameter files, tag files and templates from local disk.
//!
//! Parameter and tag files are YAML (or JSON) documents holding a single
//! top-level mapping. Values are restricted to the closed set described by
//! [`FileValue`] and are coerced to strings when loaded.

use std::fs::File;
use std::io::Read;

use indexmap::IndexMap;
use log::debug;
use serde_yaml::Value;

use crate::config::expand_path;
use crate::error::{Error, Result};
use crate::template::Template;

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(expand_path(path)) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// The value shapes accepted in a parameter or tag file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValue {
    String(String),
    Bool(bool),
    Sequence(Vec<String>),
}

impl FileValue {
    /// Converts a YAML node, returning `None` for shapes that are not allowed.
    ///
    /// Sequence items may be strings or bools; bools are coerced the same way
    /// as a top-level bool.
    #[must_use]
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Bool(b) => Some(bool_to_string(*b)),
                    _ => None,
                })
                .collect::<Option<Vec<String>>>()
                .map(Self::Sequence),
            _ => None,
        }
    }

    /// The string submitted to the remote API for this value.
    #[must_use]
    pub fn coerce(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Bool(b) => bool_to_string(*b),
            Self::Sequence(items) => items.join(","),
        }
    }
}

fn bool_to_string(b: bool) -> String {
    let text = if b { "True" } else { "False" };
    text.to_string()
}

/// Loads a key/value file, keeping keys in file order.
///
/// An empty document yields an empty mapping.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The content is not valid YAML/JSON
/// - The document is not a mapping with string keys
/// - A value is not a string, a bool or a list of those
pub fn load_key_values(path: &str, file_description: &str) -> Result<IndexMap<String, String>> {
    let reader = get_reader(file_description, path)?;

    let document: Value = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            file_description.to_string(),
            path.to_string(),
            e,
        )
    })?;

    let not_a_mapping = || Error::NotAMapping {
        file_description: file_description.to_string(),
        path: path.to_string(),
    };

    let mapping = match document {
        Value::Null => return Ok(IndexMap::new()),
        Value::Mapping(mapping) => mapping,
        _ => return Err(not_a_mapping()),
    };

    let mut values = IndexMap::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let Value::String(key) = key else {
            return Err(not_a_mapping());
        };

        let Some(value) = FileValue::from_yaml(value) else {
            return Err(Error::UnsupportedValue {
                key: key.clone(),
                file_description: file_description.to_string(),
                path: path.to_string(),
            });
        };

        values.insert(key.clone(), value.coerce());
    }

    debug!("Loaded {} keys from {} file `{}`", values.len(), file_description, path);
    Ok(values)
}

/// Reads and parses a template from a local path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the template cannot be parsed.
pub fn read_template(path: &str) -> Result<Template> {
    let mut body = String::new();
    get_reader("template", path)?
        .read_to_string(&mut body)
        .map_err(|e| Error::io_error("template".to_string(), path.to_string(), e))?;

    Template::parse(body)
}
