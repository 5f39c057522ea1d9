//! Encoders for `stat` output.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;
use sfm_core::error::{Error, Result};
use sfm_core::stack::{Resource, Stack};

use crate::cli_args::Encoding;

fn encode_error(what: &str, encoding: &str, reason: impl ToString) -> Error {
    Error::Encode {
        what: what.to_string(),
        encoding: encoding.to_string(),
        reason: reason.to_string(),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string(value)
        .map(|json| json + "\n")
        .map_err(|e| encode_error(what, "json", e))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| encode_error(what, "yaml", e))
}

/// Encodes a key/value map. Text is one `key\tvalue` line per entry; YAML is
/// a document starting with `---`.
///
/// # Errors
///
/// Returns [`Error::Encode`] if serialization fails.
pub fn encode_map(map: &BTreeMap<String, String>, encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Text => Ok(map
            .iter()
            .map(|(key, value)| format!("{key}\t{value}\n"))
            .collect()),
        Encoding::Yaml => to_yaml(map, "map").map(|yaml| format!("---\n{yaml}")),
        Encoding::Json => to_json(map, "map"),
    }
}

fn time_or_empty(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Encodes a whole stack. Text is a fixed set of tab-separated lines.
///
/// # Errors
///
/// Returns [`Error::Encode`] if serialization fails.
pub fn encode_stack(stack: &Stack, encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Text => {
            let lines = [
                ("Description", stack.description.clone()),
                ("CreationTime", time_or_empty(stack.created)),
                ("UpdateTime", time_or_empty(stack.updated)),
                ("StackStatus", stack.status().to_string()),
                ("StatusReason", stack.reason.clone()),
                ("Capabilities", stack.capabilities.iter().join(", ")),
                ("DisableRollback", stack.disable_rollback.to_string()),
                ("TermProtection", stack.termination_protection.to_string()),
                ("NotificationARNs", stack.notification_topics.iter().join(", ")),
            ];
            Ok(lines
                .iter()
                .map(|(key, value)| format!("{key}\t{value}\n"))
                .collect())
        }
        Encoding::Yaml => to_yaml(stack, "stack"),
        Encoding::Json => to_json(stack, "stack"),
    }
}

/// Logical id to physical id, the map printed by `stat -r`.
#[must_use]
pub fn resource_ids(resources: &[Resource]) -> BTreeMap<String, String> {
    resources
        .iter()
        .map(|resource| (resource.logical_id.clone(), resource.physical_id.clone()))
        .collect()
}
