//! Coarse classification of remote stack statuses.
//!
//! The remote API reports a fine-grained status string. Everything in this
//! crate reasons about the three-valued [`Phase`] instead. The mapping is a
//! closed table: statuses that are not listed are treated as errors, so a
//! status introduced later by the remote side can never be mistaken for
//! success.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Statuses that mean the last operation finished successfully.
pub const OK_STATUSES: &[&str] = &[
    "CREATE_COMPLETE",
    "IMPORT_COMPLETE",
    "DELETE_COMPLETE",
    "UPDATE_COMPLETE",
];

/// Statuses that mean an operation is still running.
pub const IN_PROGRESS_STATUSES: &[&str] = &[
    "CREATE_IN_PROGRESS",
    "DELETE_IN_PROGRESS",
    "IMPORT_IN_PROGRESS",
    "IMPORT_ROLLBACK_IN_PROGRESS",
    "REVIEW_IN_PROGRESS",
    "ROLLBACK_IN_PROGRESS",
    "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
    "UPDATE_IN_PROGRESS",
    "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
    "UPDATE_ROLLBACK_IN_PROGRESS",
];

/// Statuses left behind by a create that never succeeded. A stack in one of
/// these cannot be updated and has to be deleted before it is created again.
pub const FAILED_CREATE_STATUSES: &[&str] = &["CREATE_FAILED", "ROLLBACK_FAILED", "ROLLBACK_COMPLETE"];

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Ok,
    InProgress,
    Error,
}

impl Display for Phase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Phase::Ok => "ok",
            Phase::InProgress => "in-progress",
            Phase::Error => "error",
        })
    }
}

/// Maps a raw remote status to its [`Phase`].
///
/// # Examples
///
/// ```
/// use sfm_core::status::{classify, Phase};
///
/// assert_eq!(classify("UPDATE_COMPLETE"), Phase::Ok);
/// assert_eq!(classify("UPDATE_ROLLBACK_IN_PROGRESS"), Phase::InProgress);
/// assert_eq!(classify("SOMETHING_NEW"), Phase::Error);
/// ```
#[must_use]
pub fn classify(raw_status: &str) -> Phase {
    if OK_STATUSES.contains(&raw_status) {
        Phase::Ok
    } else if IN_PROGRESS_STATUSES.contains(&raw_status) {
        Phase::InProgress
    } else {
        Phase::Error
    }
}

#[must_use]
pub fn is_failed_create(raw_status: &str) -> bool {
    FAILED_CREATE_STATUSES.contains(&raw_status)
}
