//! Process exit codes.

use sfm_core::error::{Action, Error};

/// Any failure without a more specific code.
pub const FAILURE: u8 = 1;
/// The template could not be read from its source.
pub const TEMPLATE_UNREADABLE: u8 = 2;
/// The remote side rejected a create, update or delete.
pub const REJECTED: u8 = 3;
/// A stack left behind by a failed create could not be removed.
pub const RECOVERY_FAILED: u8 = 4;
/// Invalid invocation that clap could not catch, e.g. no stack name on stdin.
pub const USAGE: u8 = 64;
/// Invalid local input: files, templates, names.
pub const INPUT: u8 = 66;

#[must_use]
pub fn code_for(error: &Error) -> u8 {
    match error {
        Error::RecoveryFailed { .. } => RECOVERY_FAILED,
        Error::TemplateSource { .. } => TEMPLATE_UNREADABLE,
        Error::Provider {
            action: Action::Create | Action::Update | Action::Delete,
            ..
        } => REJECTED,
        Error::Usage(_) => USAGE,
        error if error.is_input_error() => INPUT,
        _ => FAILURE,
    }
}
