//! Blocking on a stack until its current operation finishes.
//!
//! The loop polls the stack status at a fixed interval for a bounded number
//! of iterations. While the stack is in progress it can print a dot per poll
//! or the stack events that appeared since the wait began.

use std::collections::HashSet;
use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::config::{DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::provider::{ProviderError, StackProvider};
use crate::render::{event_line, RenderConfig};
use crate::status::Phase;

/// What to print while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    None,
    Dots,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

pub struct Waiter<'a, P: ?Sized> {
    provider: &'a P,
    settings: WaitSettings,
    render: RenderConfig,
}

impl<'a, P: StackProvider + ?Sized> Waiter<'a, P> {
    pub fn new(provider: &'a P, settings: WaitSettings, render: RenderConfig) -> Self {
        Self {
            provider,
            settings,
            render,
        }
    }

    /// Polls `name` until it settles, writing progress to `out`.
    ///
    /// A stack that can no longer be described counts as settled: this is how
    /// a finished delete looks. Other describe failures are logged and the
    /// next poll tries again.
    ///
    /// # Errors
    ///
    /// - [`Error::StackFailed`] when the stack reaches an error phase
    /// - [`Error::Timeout`] when the poll budget runs out
    /// - [`Error::Stdio`] when progress cannot be written
    pub fn block(&self, name: &str, mode: RenderMode, out: &mut dyn Write) -> Result<()> {
        let started = Utc::now();
        let mut rendered: HashSet<DateTime<Utc>> = HashSet::new();

        for poll in 0..self.settings.max_polls {
            match self.provider.describe(name) {
                Err(ProviderError::NotFound(_)) => {
                    debug!("Stack `{name}` no longer exists, done waiting");
                    return Ok(());
                }
                Err(e) => warn!("Cannot describe stack `{name}` on poll {poll}: {e}"),
                Ok(stack) => match stack.phase() {
                    Phase::Ok => return Ok(()),
                    Phase::Error => {
                        return Err(Error::StackFailed {
                            stack: name.to_string(),
                            status: stack.status().to_string(),
                            phase: stack.phase(),
                        })
                    }
                    Phase::InProgress => {
                        if mode == RenderMode::Events {
                            self.render_events(name, started, &mut rendered, out)?;
                        }
                    }
                },
            }

            if mode == RenderMode::Dots {
                write!(out, ".")?;
                out.flush()?;
            }

            if poll + 1 < self.settings.max_polls {
                thread::sleep(self.settings.poll_interval);
            }
        }

        Err(Error::Timeout {
            stack: name.to_string(),
            polls: self.settings.max_polls,
        })
    }

    /// Prints events newer than `started` whose timestamp has not been
    /// printed yet, oldest first.
    fn render_events(
        &self,
        name: &str,
        started: DateTime<Utc>,
        rendered: &mut HashSet<DateTime<Utc>>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut events = match self.provider.events(name) {
            Ok(events) => events,
            Err(e) => {
                warn!("Cannot list events of stack `{name}`: {e}");
                return Ok(());
            }
        };
        events.sort_by_key(|event| event.timestamp);

        for event in events.iter().filter(|event| event.timestamp >= started) {
            if rendered.insert(event.timestamp) {
                writeln!(out, "{}", event_line(event, &self.render))?;
            }
        }

        Ok(())
    }
}
