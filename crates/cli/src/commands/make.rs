use log::debug;
use sfm_core::error::Result;
use sfm_core::file_handling::load_key_values;
use sfm_core::orchestrator::{Change, MakeRequest, Orchestrator};
use sfm_core::provider::StackProvider;
use sfm_core::reconcile::Sources;

use super::{block, pass_along, Io};
use crate::cli_args::MakeArgs;
use crate::template_source::{self, TemplateSource};

/// Creates or updates the stack, then optionally waits on it.
///
/// A no-op update returns without waiting: there is no operation to wait on.
///
/// # Errors
///
/// Returns an error if:
/// - No template source is available or the template cannot be read
/// - A parameter or tag file cannot be loaded
/// - The create or update fails
/// - Waiting ends in a failed stack or a timeout
pub fn run<P, F>(
    orchestrator: &Orchestrator<P>,
    args: &MakeArgs,
    io: &mut Io<'_>,
    fetch_object: F,
) -> Result<()>
where
    P: StackProvider,
    F: FnOnce(&str, &str) -> std::result::Result<Vec<u8>, String>,
{
    let source = TemplateSource::select(args.template.as_deref(), io.stdin_piped)?;
    let template = template_source::load(&source, io.stdin, fetch_object)?;

    let parameter_files = args
        .parameter_files
        .iter()
        .map(|path| load_key_values(path, "parameter"))
        .collect::<Result<Vec<_>>>()?;
    let tag_files = args
        .tags_file
        .iter()
        .map(|path| load_key_values(path, "tag"))
        .collect::<Result<Vec<_>>>()?;

    let request = MakeRequest {
        name: args.name.clone(),
        template,
        parameters: Sources::new(parameter_files, args.parameters.as_str()),
        tags: Sources::new(tag_files, args.tags.as_str()),
        notification_topics: args.topics(),
        disable_rollback: args.disable_rollback,
    };

    let outcome = orchestrator.make_or_update(&request)?;
    debug!("Submitted {:?} for `{}` with token {}", outcome.change, outcome.name, outcome.token);

    if let (Some(style), false) = (args.wait, outcome.change == Change::Unchanged) {
        block(orchestrator, &outcome.name, style.into(), io)?;
    }

    pass_along(&outcome.name, io)
}
