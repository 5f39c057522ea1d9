use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use crossterm::tty::IsTty;
use env_logger::Env;
use log::debug;
use sfm_core::config;
use sfm_core::error::Result;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::render::RenderConfig;

use sfm_cli::aws::AwsProvider;
use sfm_cli::cli_args::Args;
use sfm_cli::commands::{self, Io};
use sfm_cli::exit;

fn init_logging() {
    let default_level = if config::debug_requested() {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

fn execute(args: &Args) -> Result<()> {
    let region = config::resolve_region(args.region.as_deref())?;
    let provider = AwsProvider::connect(&region)?;

    let render = if config::color_enabled(args.no_color) {
        RenderConfig::colored()
    } else {
        RenderConfig::plain()
    };
    let orchestrator = Orchestrator::new(provider).with_render_config(render);

    let mut stdin = io::stdin();
    let mut stdout = io::stdout();
    let stdin_piped = !stdin.is_tty();
    let stdout_piped = !stdout.is_tty();
    debug!("stdin piped: {stdin_piped}, stdout piped: {stdout_piped}");

    // Keep progress off a piped stdout so the next command only sees names.
    let mut progress: Box<dyn Write> = if stdout_piped {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    let mut io = Io {
        stdin: &mut stdin,
        stdout: &mut stdout,
        progress: progress.as_mut(),
        stdin_piped,
        stdout_piped,
    };

    let result = commands::run(&args.command, &orchestrator, &mut io, |bucket, key| {
        orchestrator.provider().fetch_object(bucket, key)
    });
    io.stdout.flush()?;
    result
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(exit::code_for(&e))
        }
    }
}
