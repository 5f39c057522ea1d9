use sfm_core::error::Result;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::StackProvider;

use super::{block, pass_along, stack_name, Io};
use crate::cli_args::WaitArgs;

/// Blocks until the stack settles, then passes its name along.
///
/// # Errors
///
/// Returns an error if there is no stack name, or the stack fails or the
/// wait times out.
pub fn run<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    args: &WaitArgs,
    io: &mut Io<'_>,
) -> Result<()> {
    let name = stack_name("wait", args.name.as_deref(), io)?;
    block(orchestrator, &name, args.render_mode(), io)?;
    pass_along(&name, io)
}
