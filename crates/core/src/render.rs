//! Terminal rendering of events and stack summaries.
//!
//! Colors are decided by an injected [`RenderConfig`]; nothing here reads
//! the environment or the platform.

use chrono::{DateTime, Local, Utc};
use crossterm::style::{Color, Stylize};

use crate::stack::{Event, Stack};

const RESOURCE_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 20;
const TIME_FORMAT: &str = "%H:%M:%S %Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub success: Color,
    pub failure: Color,
    pub caution: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            success: Color::Green,
            failure: Color::Red,
            caution: Color::Cyan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub color: bool,
    pub palette: Palette,
}

impl RenderConfig {
    #[must_use]
    pub fn plain() -> Self {
        Self {
            color: false,
            palette: Palette::default(),
        }
    }

    #[must_use]
    pub fn colored() -> Self {
        Self {
            color: true,
            palette: Palette::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::colored()
    }
}

/// Shortens `text` to `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Picks the color for an event status. Rollback completions are checked
/// before the generic `_COMPLETE` suffix so they stand out.
#[must_use]
pub fn status_color(status: &str, palette: &Palette) -> Option<Color> {
    if status.ends_with("ROLLBACK_COMPLETE") {
        Some(palette.caution)
    } else if status.ends_with("_COMPLETE") {
        Some(palette.success)
    } else if status.ends_with("_FAILED") {
        Some(palette.failure)
    } else {
        None
    }
}

fn local_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

fn dash_if_empty(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

/// One line per event: local time, resource, status, reason.
#[must_use]
pub fn event_line(event: &Event, config: &RenderConfig) -> String {
    let resource = truncate(dash_if_empty(&event.resource), RESOURCE_WIDTH);

    let status = format!(
        "{:<width$}",
        truncate(&event.status, STATUS_WIDTH),
        width = STATUS_WIDTH
    );
    let status = match status_color(&event.status, &config.palette) {
        Some(color) if config.color => status.with(color).to_string(),
        _ => status,
    };

    format!(
        "{} {:<width$} {} {}",
        local_time(event.timestamp),
        resource,
        status,
        dash_if_empty(&event.reason),
        width = RESOURCE_WIDTH
    )
}

/// Tab-separated `time, name, status` line used by verbose listings.
#[must_use]
pub fn stack_summary_line(stack: &Stack) -> String {
    let time = stack.last_changed().map(local_time).unwrap_or_default();
    format!("{}\t{}\t{}", time, stack.name, stack.status())
}
