//! Info command - Show session statistics (non-interactive).

use agentrace_timeline::{compile, read_events_from_path, BlockType, DisplayBlock};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SessionStats {
    session_id: Option<String>,
    event_count: usize,
    block_count: usize,
    messages: usize,
    tool_calls: usize,
    plan_operations: usize,
    local_commands: usize,
    thinking: usize,
    unknown: usize,
    started_at: Option<String>,
    ended_at: Option<String>,
    tools_used: Vec<String>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let events = read_events_from_path(path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    let timeline = compile(&events);

    let session_id = events
        .iter()
        .map(|e| e.session_id.clone())
        .find(|s| !s.is_empty());
    let mut timestamps: Vec<_> = events.iter().filter_map(|e| e.created_at).collect();
    timestamps.sort();

    let mut tools: Vec<String> = timeline
        .blocks
        .iter()
        .filter_map(|b| b.tool_name.clone())
        .collect();
    tools.sort();
    tools.dedup();

    let stats = SessionStats {
        session_id,
        event_count: events.len(),
        block_count: timeline.blocks.len(),
        messages: timeline.messages.len(),
        tool_calls: count_types(
            &timeline.blocks,
            &[BlockType::ToolUse, BlockType::ToolGroup, BlockType::AgentraceTool],
        ),
        plan_operations: count_types(&timeline.blocks, &[BlockType::AgentraceTool]),
        local_commands: count_types(
            &timeline.blocks,
            &[BlockType::LocalCommand, BlockType::LocalCommandGroup],
        ),
        thinking: count_types(&timeline.blocks, &[BlockType::Thinking]),
        unknown: count_types(&timeline.blocks, &[BlockType::Unknown]),
        started_at: timestamps.first().map(|t| t.to_rfc3339()),
        ended_at: timestamps.last().map(|t| t.to_rfc3339()),
        tools_used: tools,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Session:        {}",
            stats.session_id.as_deref().unwrap_or("(unknown)")
        );
        println!("Events:         {}", stats.event_count);
        println!("Blocks:         {}", stats.block_count);
        println!("Messages:       {}", stats.messages);
        println!("Tool calls:     {}", stats.tool_calls);
        println!("Plan ops:       {}", stats.plan_operations);
        println!("Local commands: {}", stats.local_commands);
        println!("Thinking:       {}", stats.thinking);
        if stats.unknown > 0 {
            println!("Unknown:        {}", stats.unknown);
        }
        if let (Some(start), Some(end)) = (&stats.started_at, &stats.ended_at) {
            println!();
            println!("Started:        {}", start);
            println!("Ended:          {}", end);
        }
        if !stats.tools_used.is_empty() {
            println!();
            println!("Tools used:     {}", stats.tools_used.join(", "));
        }
    }

    Ok(())
}

fn count_types(blocks: &[DisplayBlock], types: &[BlockType]) -> usize {
    blocks
        .iter()
        .filter(|b| types.contains(&b.block_type))
        .count()
}
