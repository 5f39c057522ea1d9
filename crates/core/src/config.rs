//! Runtime settings for sfm.
//!
//! This module holds the fixed limits used when talking to the remote API
//! and resolves the few settings that come from the environment: the region,
//! debug output and terminal colors.

use std::time::Duration;

use crate::error::{Error, Result};

/// Time slept between two polls of a stack's status.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Polls before giving up. At the default interval this is at least an hour;
/// provider retries on rate limiting only make it longer.
pub const DEFAULT_MAX_POLLS: u32 = 30 * 60;

/// Capabilities acknowledged on every create and update.
pub const DEFAULT_CAPABILITIES: &[&str] = &["CAPABILITY_NAMED_IAM", "CAPABILITY_AUTO_EXPAND"];

/// Attempts per remote call, including the first, for the provider's retryer.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;
/// Upper bound of the provider's exponential backoff.
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);
/// Pages read when listing stacks.
pub const MAX_LIST_PAGES: usize = 200;

/// Environment variables consulted for the region, in order.
pub const REGION_VARIABLES: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolves the region from the flag, then the environment.
///
/// # Errors
///
/// Returns [`Error::MissingRegion`] if no source provides a region.
pub fn resolve_region(region_arg: Option<&str>) -> Result<String> {
    resolve_region_with(region_arg, |name| std::env::var(name).ok())
}

/// Same as [`resolve_region`] with an explicit variable lookup.
///
/// # Errors
///
/// Returns [`Error::MissingRegion`] if no source provides a region.
///
/// # Examples
///
/// ```
/// use sfm_core::config::resolve_region_with;
///
/// let region = resolve_region_with(None, |name| {
///     (name == "AWS_DEFAULT_REGION").then(|| "eu-west-1".to_string())
/// });
/// assert_eq!(region.unwrap(), "eu-west-1");
/// ```
pub fn resolve_region_with<F>(region_arg: Option<&str>, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(region) = non_empty(region_arg.map(ToString::to_string)) {
        return Ok(region);
    }

    REGION_VARIABLES
        .iter()
        .find_map(|name| non_empty(lookup(name)))
        .ok_or(Error::MissingRegion)
}

/// Expands a leading `~` to the home directory. Environment variables are
/// left as they are.
#[must_use]
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

/// Whether `DEBUG` is set to a non-empty value.
#[must_use]
pub fn debug_requested() -> bool {
    non_empty(std::env::var("DEBUG").ok()).is_some()
}

/// Whether event output should be colored.
#[must_use]
pub fn color_enabled(no_color_arg: bool) -> bool {
    color_enabled_with(no_color_arg, cfg!(windows), |name| std::env::var(name).ok())
}

#[must_use]
pub fn color_enabled_with<F>(no_color_arg: bool, windows: bool, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    !no_color_arg && !windows && non_empty(lookup("NO_COLOR")).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_region_flag_wins() {
        let region = resolve_region_with(Some("us-east-1"), env(&[("AWS_REGION", "eu-west-1")]));
        assert_eq!(region.unwrap(), "us-east-1");
    }

    #[test]
    fn test_region_from_environment_in_order() {
        let region = resolve_region_with(
            None,
            env(&[("AWS_DEFAULT_REGION", "ap-southeast-2"), ("AWS_REGION", "eu-west-1")]),
        );
        assert_eq!(region.unwrap(), "eu-west-1");

        let region = resolve_region_with(Some(""), env(&[("AWS_DEFAULT_REGION", "ap-southeast-2")]));
        assert_eq!(region.unwrap(), "ap-southeast-2");
    }

    #[test]
    fn test_region_missing() {
        let result = resolve_region_with(None, env(&[("AWS_REGION", "")]));
        assert!(matches!(result, Err(Error::MissingRegion)));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let result = expand_path("~/params.yml");
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("params.yml"));
    }

    #[test]
    fn test_expand_path_keeps_variables() {
        assert_eq!(expand_path("$HOME/params.yml"), "$HOME/params.yml");
    }

    #[test]
    fn test_expand_path_without_tilde() {
        assert_eq!(expand_path("/absolute/params.yml"), "/absolute/params.yml");
    }

    #[test]
    fn test_color_enabled() {
        assert!(color_enabled_with(false, false, env(&[])));
        assert!(!color_enabled_with(true, false, env(&[])));
        assert!(!color_enabled_with(false, true, env(&[])));
        assert!(!color_enabled_with(false, false, env(&[("NO_COLOR", "1")])));
        assert!(color_enabled_with(false, false, env(&[("NO_COLOR", "")])));
    }

    #[test]
    fn test_poll_budget_is_about_an_hour() {
        assert_eq!(DEFAULT_POLL_INTERVAL * DEFAULT_MAX_POLLS, Duration::from_secs(3600));
    }
}
