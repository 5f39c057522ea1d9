//! An in-memory provider that replays scripted responses and records calls.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sfm_core::provider::{
    CreateRequest, ProviderError, ProviderResult, StackProvider, UpdateRequest,
};
use sfm_core::stack::{Event, Resource, Stack};
use sfm_core::template::Template;
use sfm_core::wait::WaitSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Describe(String),
    Create(CreateRequest),
    Update(UpdateRequest),
    Delete { name: String, token: String },
    Events(String),
    List,
    Resources(String),
}

impl Call {
    pub fn kind(&self) -> &'static str {
        match self {
            Call::Describe(_) => "describe",
            Call::Create(_) => "create",
            Call::Update(_) => "update",
            Call::Delete { .. } => "delete",
            Call::Events(_) => "events",
            Call::List => "list",
            Call::Resources(_) => "resources",
        }
    }
}

/// Responses are consumed front to back. An exhausted describe queue answers
/// `NotFound`; exhausted mutation queues answer `Ok`; an exhausted events
/// queue answers with no events.
#[derive(Default)]
pub struct FakeProvider {
    describes: RefCell<VecDeque<ProviderResult<Stack>>>,
    creates: RefCell<VecDeque<ProviderResult<()>>>,
    updates: RefCell<VecDeque<ProviderResult<()>>>,
    deletes: RefCell<VecDeque<ProviderResult<()>>>,
    events: RefCell<VecDeque<ProviderResult<Vec<Event>>>>,
    stacks: Vec<Stack>,
    resources: Vec<Resource>,
    calls: RefCell<Vec<Call>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe(self, result: ProviderResult<Stack>) -> Self {
        self.describes.borrow_mut().push_back(result);
        self
    }

    pub fn describe_status(self, name: &str, status: &str) -> Self {
        self.describe(Ok(Stack::new(name, status)))
    }

    pub fn create(self, result: ProviderResult<()>) -> Self {
        self.creates.borrow_mut().push_back(result);
        self
    }

    pub fn update(self, result: ProviderResult<()>) -> Self {
        self.updates.borrow_mut().push_back(result);
        self
    }

    pub fn delete(self, result: ProviderResult<()>) -> Self {
        self.deletes.borrow_mut().push_back(result);
        self
    }

    pub fn events(self, result: ProviderResult<Vec<Event>>) -> Self {
        self.events.borrow_mut().push_back(result);
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

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_kinds(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(Call::kind).collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.kind() == kind).count()
    }

    pub fn created(&self) -> Vec<CreateRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Create(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn updated(&self) -> Vec<UpdateRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Update(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl StackProvider for FakeProvider {
    fn describe(&self, name: &str) -> ProviderResult<Stack> {
        self.record(Call::Describe(name.to_string()));
        self.describes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::NotFound(name.to_string())))
    }

    fn create(&self, request: &CreateRequest) -> ProviderResult<()> {
        self.record(Call::Create(request.clone()));
        self.creates.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    fn update(&self, request: &UpdateRequest) -> ProviderResult<()> {
        self.record(Call::Update(request.clone()));
        self.updates.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    fn delete(&self, name: &str, token: &str) -> ProviderResult<()> {
        self.record(Call::Delete {
            name: name.to_string(),
            token: token.to_string(),
        });
        self.deletes.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    fn events(&self, name: &str) -> ProviderResult<Vec<Event>> {
        self.record(Call::Events(name.to_string()));
        self.events.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
    }

    fn list(&self) -> ProviderResult<Vec<Stack>> {
        self.record(Call::List);
        Ok(self.stacks.clone())
    }

    fn resources(&self, name: &str) -> ProviderResult<Vec<Resource>> {
        self.record(Call::Resources(name.to_string()));
        Ok(self.resources.clone())
    }
}

pub fn fast_wait(max_polls: u32) -> WaitSettings {
    WaitSettings {
        poll_interval: Duration::from_millis(1),
        max_polls,
    }
}

pub fn event(resource: &str, status: &str, timestamp: DateTime<Utc>) -> Event {
    Event {
        id: format!("{resource}-{status}-{}", timestamp.timestamp_millis()),
        resource: resource.to_string(),
        status: status.to_string(),
        reason: String::new(),
        timestamp,
        token: None,
    }
}

pub fn template(keys: &[&str]) -> Template {
    let mut body = String::from("Parameters:\n");
    for key in keys {
        body.push_str(&format!("  {key}:\n    Type: String\n"));
    }
    body.push_str("Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\n");
    Template::parse(body).unwrap()
}
