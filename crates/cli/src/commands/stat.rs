
use sfm_core::error::Result;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::StackProvider;

use super::{stack_name, Io};
use crate::cli_args::{Selector, StatArgs};
use crate::output::{encode_map, encode_stack, resource_ids};

/// Prints the stack, or one of its key/value sections.
///
/// # Errors
///
/// Returns an error if there is no stack name, the stack or its resources
/// cannot be read, or the output cannot be encoded.
pub fn run<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    args: &StatArgs,
    io: &mut Io<'_>,
) -> Result<()> {
    let name = stack_name("stat", args.name.as_deref(), io)?;
    let stack = orchestrator.get(&name)?;

    let encoded = match args.selector() {
        Some(Selector::Outputs) => encode_map(&stack.outputs, args.encoding)?,
        Some(Selector::Parameters) => encode_map(&stack.parameters, args.encoding)?,
        Some(Selector::Tags) => encode_map(&stack.tags, args.encoding)?,
        Some(Selector::Resources) => {
            encode_map(&resource_ids(&orchestrator.resources(&name)?), args.encoding)?
        }
        None => encode_stack(&stack, args.encoding)?,
    };

    write!(io.stdout, "{encoded}")?;
    Ok(())
}
