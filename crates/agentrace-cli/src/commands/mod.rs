//! Non-interactive subcommands (stdout output, scripting-friendly).

pub mod info;
pub mod link;
pub mod outline;
pub mod view;

use agentrace_timeline::{compile, read_events_from_path, Timeline};
use anyhow::{Context, Result};
use std::path::Path;

/// Load an event log and compile it. Shared by every subcommand and the TUI.
pub fn load_timeline(path: &Path) -> Result<Timeline> {
    let events = read_events_from_path(path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    let timeline = compile(&events);
    tracing::debug!(
        events = events.len(),
        blocks = timeline.blocks.len(),
        "compiled timeline"
    );
    Ok(timeline)
}
