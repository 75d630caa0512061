//! View command - Print the compiled timeline to stdout (non-interactive).

use agentrace_timeline::{BlockType, DisplayBlock};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

use super::load_timeline;

pub fn run(path: &Path, json: bool, block_type: Option<&str>) -> Result<()> {
    let timeline = load_timeline(path)?;

    if json {
        // In JSON mode, output blocks as a JSON array
        let blocks: Vec<&DisplayBlock> = timeline
            .blocks
            .iter()
            .filter(|b| match block_type {
                Some(t) => block_matches_type(b, t),
                None => true,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    // Plain text mode
    for block in &timeline.blocks {
        if let Some(t) = block_type {
            if !block_matches_type(block, t) {
                continue;
            }
        }
        print_block(block, 0);
    }

    Ok(())
}

fn print_block(block: &DisplayBlock, depth: usize) {
    let indent = "  ".repeat(depth);
    let ts = format_ts(block.timestamp);

    match block.block_type {
        BlockType::Text => {
            let speaker = match block.role {
                Some(agentrace_timeline::Role::Assistant) => "ASSISTANT",
                _ => "USER",
            };
            println!("{}[{}] {}:", indent, ts, speaker);
            if let Some(text) = block.text_content() {
                println!("{}{}", indent, text);
            }
            println!();
        }
        BlockType::Thinking => {
            let preview = block.text_content().map(|t| truncate(t, 120)).unwrap_or_default();
            println!("{}[{}] THINKING: {}", indent, ts, preview);
        }
        BlockType::ToolUse | BlockType::ToolGroup | BlockType::AgentraceTool => {
            let name = block.tool_name.as_deref().unwrap_or(&block.label.text);
            let params = block.label.params.as_deref().unwrap_or("");
            println!("{}[{}] TOOL: {} {}", indent, ts, name, params);
            for link in &block.plan_links {
                match &link.changed_status {
                    Some(status) => println!("{}  plan {} -> {}", indent, link.id, status),
                    None => println!("{}  plan {}", indent, link.id),
                }
            }
            if let Some(result) = block.tool_result_block() {
                print_block(result, depth + 1);
            }
        }
        BlockType::ToolResult => {
            let status = if block.is_error { "ERROR" } else { "OK" };
            let text = result_preview(block);
            println!("{}[{}] RESULT [{}]: {}", indent, ts, status, text);
        }
        BlockType::LocalCommand | BlockType::LocalCommandGroup => {
            let params = block.label.params.as_deref().unwrap_or("");
            println!("{}[{}] COMMAND: {}", indent, ts, params);
            for child in &block.child_blocks {
                print_block(child, depth + 1);
            }
        }
        BlockType::LocalCommandOutput => {
            let text = block.text_content().map(|t| truncate(t, 200)).unwrap_or_default();
            println!("{}[{}] OUTPUT: {}", indent, ts, text);
        }
        BlockType::CompactSummary => {
            let text = block.text_content().map(|t| truncate(t, 200)).unwrap_or_default();
            println!("{}[{}] SUMMARY: {}", indent, ts, text);
        }
        BlockType::Unknown => {
            println!("{}[{}] UNKNOWN ({})", indent, ts, block.event_type);
        }
    }
}

fn result_preview(block: &DisplayBlock) -> String {
    match &block.content {
        serde_json::Value::String(s) => truncate(s, 200),
        serde_json::Value::Null => String::new(),
        other => truncate(&other.to_string(), 200),
    }
}

fn block_matches_type(block: &DisplayBlock, type_filter: &str) -> bool {
    match type_filter {
        "text" | "message" => matches!(block.block_type, BlockType::Text),
        "thinking" => matches!(block.block_type, BlockType::Thinking),
        "tool_use" | "tool-use" => matches!(block.block_type, BlockType::ToolUse),
        "tool_result" | "tool-result" => matches!(block.block_type, BlockType::ToolResult),
        "tool_group" | "tool-group" | "tool" => matches!(
            block.block_type,
            BlockType::ToolGroup | BlockType::AgentraceTool
        ),
        "plan" | "agentrace_tool" => matches!(block.block_type, BlockType::AgentraceTool),
        "local_command" | "command" => matches!(
            block.block_type,
            BlockType::LocalCommand | BlockType::LocalCommandGroup
        ),
        "summary" | "compact_summary" => matches!(block.block_type, BlockType::CompactSummary),
        "unknown" => matches!(block.block_type, BlockType::Unknown),
        _ => true,
    }
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M:%S").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    let single_line = s.replace('\n', " ");
    if single_line.len() > max {
        let mut end = max.saturating_sub(3);
        while end > 0 && !single_line.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &single_line[..end])
    } else {
        single_line
    }
}
