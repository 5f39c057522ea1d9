//! Subcommand implementations.
//!
//! Each subcommand runs against an [`Orchestrator`] over any
//! [`StackProvider`] and talks to the terminal only through [`Io`], so the
//! binary can hand it real stdio and tests can hand it buffers.

use std::io::{Read, Write};

use sfm_core::error::{Error, Result};
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::StackProvider;
use sfm_core::wait::RenderMode;

use crate::cli_args::Command;

pub mod list;
pub mod make;
pub mod remove;
pub mod stat;
pub mod wait;

/// The streams a subcommand may use.
///
/// `stdout` carries results: names, listings, `stat` output. `progress`
/// carries dots and events while waiting, and should not be `stdout` when
/// stdout is piped into another command.
pub struct Io<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub progress: &'a mut dyn Write,
    pub stdin_piped: bool,
    pub stdout_piped: bool,
}

/// Runs one subcommand.
///
/// `fetch_object` downloads S3 templates for `mk`.
///
/// # Errors
///
/// Returns whatever the subcommand fails with.
pub fn run<P, F>(
    command: &Command,
    orchestrator: &Orchestrator<P>,
    io: &mut Io<'_>,
    fetch_object: F,
) -> Result<()>
where
    P: StackProvider,
    F: FnOnce(&str, &str) -> std::result::Result<Vec<u8>, String>,
{
    match command {
        Command::Ls(args) => list::run(orchestrator, args, io),
        Command::Mk(args) => make::run(orchestrator, args, io, fetch_object),
        Command::Rm(args) => remove::run(orchestrator, args, io),
        Command::Wait(args) => wait::run(orchestrator, args, io),
        Command::Stat(args) => stat::run(orchestrator, args, io),
    }
}

/// The stack name from stdin when piped, otherwise from the positional
/// argument.
fn stack_name(subcommand: &str, arg: Option<&str>, io: &mut Io<'_>) -> Result<String> {
    if io.stdin_piped {
        let mut piped = String::new();
        io.stdin.read_to_string(&mut piped)?;
        let piped = piped.trim();
        if !piped.is_empty() {
            return Ok(piped.to_string());
        }
    }

    arg.filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| {
            Error::Usage(format!(
                "{subcommand} requires a stack name on stdin or as the only positional argument"
            ))
        })
}

/// Blocks on `name`, ending a line of dots with a newline.
fn block<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    name: &str,
    mode: RenderMode,
    io: &mut Io<'_>,
) -> Result<()> {
    let result = orchestrator.await_completion(name, mode, io.progress);
    if mode == RenderMode::Dots {
        writeln!(io.progress)?;
    }
    result
}

/// Echoes the stack name for the next command in a pipeline.
fn pass_along(name: &str, io: &mut Io<'_>) -> Result<()> {
    if io.stdout_piped {
        writeln!(io.stdout, "{name}")?;
    }
    Ok(())
}
