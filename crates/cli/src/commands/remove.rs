use log::{debug, warn};
use sfm_core::error::Result;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::StackProvider;

use super::{block, pass_along, Io};
use crate::cli_args::RemoveArgs;

/// Deletes the stack, then optionally waits for the delete to finish.
///
/// # Errors
///
/// Returns an error if the delete is rejected or waiting fails.
pub fn run<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    args: &RemoveArgs,
    io: &mut Io<'_>,
) -> Result<()> {
    if args.force {
        warn!("--force is not implemented; empty any buckets yourself");
    }

    let token = orchestrator.remove(&args.name)?;
    debug!("Submitted delete for `{}` with token {token}", args.name);

    if let Some(style) = args.wait {
        block(orchestrator, &args.name, style.into(), io)?;
    }

    pass_along(&args.name, io)
}
