//! Runs subcommands against a scripted provider with in-memory stdio.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::time::Duration;

use clap::Parser;
use sfm_cli::cli_args::Args;
use sfm_cli::commands::{self, Io};
use sfm_core::error::Result;
use sfm_core::orchestrator::Orchestrator;
use sfm_core::provider::{
    CreateRequest, ProviderError, ProviderResult, StackProvider, UpdateRequest,
};
use sfm_core::stack::{Event, Resource, Stack};
use sfm_core::wait::WaitSettings;

pub const TEMPLATE: &str = "Parameters:\n  Env:\n    Type: String\n  Size:\n    Type: String\nResources:\n  Bucket:\n    Type: AWS::S3::Bucket\n";

/// Describes are answered front to back, then with `NotFound`. Every
/// mutation succeeds unless a rejection was queued for it.
#[derive(Default)]
pub struct ScriptedProvider {
    describes: RefCell<VecDeque<ProviderResult<Stack>>>,
    rejections: RefCell<VecDeque<ProviderError>>,
    stacks: Vec<Stack>,
    resources: Vec<Resource>,
    pub creates: RefCell<Vec<CreateRequest>>,
    pub updates: RefCell<Vec<UpdateRequest>>,
    pub deletes: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe(self, stack: Stack) -> Self {
        self.describes.borrow_mut().push_back(Ok(stack));
        self
    }

    pub fn missing(self, name: &str) -> Self {
        self.describes
            .borrow_mut()
            .push_back(Err(ProviderError::NotFound(name.to_string())));
        self
    }

    pub fn reject_next(self, error: ProviderError) -> Self {
        self.rejections.borrow_mut().push_back(error);
        self
    }

    pub fn stacks(mut self, stacks: Vec<Stack>) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    fn outcome(&self) -> ProviderResult<()> {
        self.rejections.borrow_mut().pop_front().map_or(Ok(()), Err)
    }
}

impl StackProvider for ScriptedProvider {
    fn describe(&self, name: &str) -> ProviderResult<Stack> {
        self.describes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::NotFound(name.to_string())))
    }

    fn create(&self, request: &CreateRequest) -> ProviderResult<()> {
        self.creates.borrow_mut().push(request.clone());
        self.outcome()
    }

    fn update(&self, request: &UpdateRequest) -> ProviderResult<()> {
        self.updates.borrow_mut().push(request.clone());
        self.outcome()
    }

    fn delete(&self, name: &str, _token: &str) -> ProviderResult<()> {
        self.deletes.borrow_mut().push(name.to_string());
        self.outcome()
    }

    fn events(&self, _name: &str) -> ProviderResult<Vec<Event>> {
        Ok(Vec::new())
    }

    fn list(&self) -> ProviderResult<Vec<Stack>> {
        Ok(self.stacks.clone())
    }

    fn resources(&self, _name: &str) -> ProviderResult<Vec<Resource>> {
        Ok(self.resources.clone())
    }
}

pub fn orchestrator(provider: ScriptedProvider) -> Orchestrator<ScriptedProvider> {
    Orchestrator::new(provider).with_wait_settings(WaitSettings {
        poll_interval: Duration::from_millis(1),
        max_polls: 5,
    })
}

pub struct Captured {
    pub result: Result<()>,
    pub stdout: String,
    pub progress: String,
}

/// Runs `sfm <argv>`. `piped_stdin` of `Some` marks stdin as piped.
pub fn run_sfm<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    argv: &[&str],
    piped_stdin: Option<&str>,
    stdout_piped: bool,
) -> Captured {
    run_sfm_with_objects(orchestrator, argv, piped_stdin, stdout_piped, &[])
}

/// Like [`run_sfm`], serving S3 objects from `objects` as `(bucket, key, body)`.
pub fn run_sfm_with_objects<P: StackProvider>(
    orchestrator: &Orchestrator<P>,
    argv: &[&str],
    piped_stdin: Option<&str>,
    stdout_piped: bool,
    objects: &[(&str, &str, &str)],
) -> Captured {
    let args = Args::try_parse_from(std::iter::once("sfm").chain(argv.iter().copied())).unwrap();

    let mut stdin = Cursor::new(piped_stdin.unwrap_or_default().as_bytes().to_vec());
    let mut stdout = Vec::new();
    let mut progress = Vec::new();

    let result = {
        let mut io = Io {
            stdin: &mut stdin,
            stdout: &mut stdout,
            progress: &mut progress,
            stdin_piped: piped_stdin.is_some(),
            stdout_piped,
        };
        commands::run(&args.command, orchestrator, &mut io, |bucket, key| {
            objects
                .iter()
                .find(|(b, k, _)| *b == bucket && *k == key)
                .map(|(_, _, body)| body.as_bytes().to_vec())
                .ok_or_else(|| "NoSuchKey: The specified key does not exist.".to_string())
        })
    };

    Captured {
        result,
        stdout: String::from_utf8(stdout).unwrap(),
        progress: String::from_utf8(progress).unwrap(),
    }
}
