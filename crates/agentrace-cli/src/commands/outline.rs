//! Outline command - Print the navigation index (non-interactive).

use agentrace_timeline::Role;
use anyhow::Result;
use std::path::Path;

use super::load_timeline;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let timeline = load_timeline(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline.messages)?);
        return Ok(());
    }

    for entry in &timeline.messages {
        let marker = match entry.role {
            Role::User => ">",
            Role::Assistant => "<",
        };
        println!(
            "[{}] {} {}  ({})",
            entry.timestamp.format("%H:%M:%S"),
            marker,
            entry.preview,
            entry.id
        );
    }

    Ok(())
}
