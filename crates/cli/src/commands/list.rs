
use sfm_core::error::Result;
use sfm_core::filter::NameFilter;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::StackProvider;
use sfm_core::render::stack_summary_line;

use super::Io;
use crate::cli_args::ListArgs;

/// Prints matching stack names, one per line.
///
/// # Errors
///
/// Returns an error for a malformed glob or a failed listing.
pub fn run<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    args: &ListArgs,
    io: &mut Io<'_>,
) -> Result<()> {
    let filter = NameFilter::new(&args.glob)?;

    for stack in orchestrator.list(&filter)? {
        if args.verbose {
            writeln!(io.stdout, "{}", stack_summary_line(&stack))?;
        } else {
            writeln!(io.stdout, "{stack}")?;
        }
    }

    Ok(())
}
