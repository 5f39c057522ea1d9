//! Merging parameter and tag sources into the set submitted to the remote API.
//!
//! Precedence, lowest first: file sources in the order given, then the
//! inline `key=value,key=value` list. Parameters are then filtered to the keys
//! the template declares and, on update, missing declared keys are carried
//! forward from the stack's stored parameters. Tags are neither filtered nor
//! carried forward.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};

use crate::template::Template;

pub type KeyValues = IndexMap<String, String>;

/// The inputs for one merge: file sources in precedence order, then an inline
/// list that overrides all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub files: Vec<KeyValues>,
    pub inline: String,
}

impl Sources {
    pub fn new(files: Vec<KeyValues>, inline: impl Into<String>) -> Self {
        Self {
            files,
            inline: inline.into(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct InlinePairs {
    pub pairs: Vec<(String, String)>,
    /// Segments that had no `=` and were dropped.
    pub malformed: Vec<String>,
}

/// Splits `k1=v1,k2=v2` into pairs. Empty segments are skipped; only the
/// first `=` separates key from value.
///
/// # Examples
///
/// ```
/// use sfm_core::reconcile::parse_inline;
///
/// let parsed = parse_inline("Env=prod,oops,Url=a=b");
/// assert_eq!(parsed.pairs.len(), 2);
/// assert_eq!(parsed.pairs[1], ("Url".to_string(), "a=b".to_string()));
/// assert_eq!(parsed.malformed, vec!["oops".to_string()]);
/// ```
#[must_use]
pub fn parse_inline(inline: &str) -> InlinePairs {
    let mut parsed = InlinePairs::default();

    for segment in inline.split(',').filter(|segment| !segment.is_empty()) {
        match segment.split_once('=') {
            Some((key, value)) => parsed.pairs.push((key.to_string(), value.to_string())),
            None => parsed.malformed.push(segment.to_string()),
        }
    }

    parsed
}

fn overlay<I>(base: KeyValues, entries: I) -> KeyValues
where
    I: IntoIterator<Item = (String, String)>,
{
    base.into_iter().chain(entries).collect()
}

/// Merges files then the inline list, last write wins.
///
/// `kind` only labels the warning logged for malformed inline segments.
#[must_use]
pub fn merge(sources: &Sources, kind: &str) -> KeyValues {
    let from_files = sources.files.iter().fold(KeyValues::new(), |merged, file| {
        overlay(merged, file.iter().map(|(k, v)| (k.clone(), v.clone())))
    });

    let inline = parse_inline(&sources.inline);
    for segment in &inline.malformed {
        warn!("{kind} kvp '{segment}' missing '=' splitter, ignoring");
    }

    overlay(from_files, inline.pairs)
}

/// Builds the parameters to submit for a stack.
///
/// `previous` is the stored parameter set of the stack being updated, or
/// `None` when the stack is being created.
#[must_use]
pub fn reconcile_parameters(
    sources: &Sources,
    template: &Template,
    previous: Option<&BTreeMap<String, String>>,
) -> KeyValues {
    let (supplied, undeclared): (Vec<_>, Vec<_>) = merge(sources, "param")
        .into_iter()
        .partition(|(key, _)| template.declares(key));

    if !undeclared.is_empty() {
        debug!(
            "Dropping parameters not declared by the template: {}",
            undeclared.iter().map(|(key, _)| key).join(", ")
        );
    }

    let supplied: KeyValues = supplied.into_iter().collect();

    let Some(previous) = previous else {
        return supplied;
    };

    let carried: Vec<(String, String)> = template
        .declared()
        .iter()
        .filter(|key| !supplied.contains_key(*key))
        .filter_map(|key| previous.get(key).map(|value| (key.clone(), value.clone())))
        .collect();

    if !carried.is_empty() {
        debug!(
            "Carrying forward previous values for: {}",
            carried.iter().map(|(key, _)| key).join(", ")
        );
    }

    overlay(supplied, carried)
}

#[must_use]
pub fn reconcile_tags(sources: &Sources) -> KeyValues {
    merge(sources, "tag")
}
