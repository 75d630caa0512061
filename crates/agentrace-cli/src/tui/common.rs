//! Shared TUI helpers for the timeline viewer.

use agentrace_timeline::{BlockType, DisplayBlock, Role};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Truncate a string to fit within `max_len` bytes, respecting char boundaries.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    if max_len == 0 {
        return "";
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render one top-level block (and its grouped children) into styled lines.
pub fn render_block_lines(block: &DisplayBlock, lines: &mut Vec<Line<'static>>, width: usize) {
    match block.block_type {
        BlockType::Text => {
            let (header, color) = match block.role {
                Some(Role::Assistant) => ("ASSISTANT", Color::Magenta),
                _ => ("USER", Color::Green),
            };
            lines.push(Line::from(Span::styled(
                header,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for line in block.text_content().unwrap_or("").lines() {
                let truncated = truncate_str(line, width.saturating_sub(2));
                lines.push(Line::from(Span::styled(
                    format!("  {}", truncated),
                    Style::default().fg(color),
                )));
            }
            lines.push(Line::from(""));
        }
        BlockType::Thinking => {
            let collapsed = block.text_content().unwrap_or("").replace('\n', " ");
            let preview = truncate_str(&collapsed, width.saturating_sub(10));
            lines.push(Line::from(vec![
                Span::styled(
                    "THINKING ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::DIM),
                ),
                Span::styled(
                    preview.to_string(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]));
        }
        BlockType::ToolUse | BlockType::ToolGroup | BlockType::AgentraceTool => {
            let name = block
                .tool_name
                .clone()
                .unwrap_or_else(|| block.label.text.clone());
            let header = if block.block_type == BlockType::AgentraceTool {
                "PLAN "
            } else {
                "TOOL "
            };
            lines.push(Line::from(vec![
                Span::styled(
                    header,
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(name, Style::default().fg(Color::Blue)),
            ]));
            if let Some(ref params) = block.label.params {
                lines.push(Line::from(Span::styled(
                    format!("  {}", truncate_str(params, width.saturating_sub(4))),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for link in &block.plan_links {
                let text = match &link.changed_status {
                    Some(status) => format!("  plan {} -> {}", link.id, status),
                    None => format!("  plan {}", link.id),
                };
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::Cyan),
                )));
            }
            if let Some(result) = block.tool_result_block() {
                render_result_lines(result, lines, width);
            }
            lines.push(Line::from(""));
        }
        BlockType::ToolResult => {
            render_result_lines(block, lines, width);
            lines.push(Line::from(""));
        }
        BlockType::LocalCommand | BlockType::LocalCommandGroup => {
            lines.push(Line::from(vec![
                Span::styled(
                    "COMMAND ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    block.label.params.clone().unwrap_or_default(),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
            for child in &block.child_blocks {
                let text = child.text_content().unwrap_or("");
                for line in text.lines().take(5) {
                    let truncated = truncate_str(line, width.saturating_sub(4));
                    lines.push(Line::from(Span::styled(
                        format!("  {}", truncated),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                let line_count = text.lines().count();
                if line_count > 5 {
                    lines.push(Line::from(Span::styled(
                        format!("  ... ({} more lines)", line_count - 5),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            lines.push(Line::from(""));
        }
        BlockType::LocalCommandOutput | BlockType::CompactSummary => {
            let header = if block.block_type == BlockType::CompactSummary {
                "SUMMARY"
            } else {
                "OUTPUT"
            };
            lines.push(Line::from(Span::styled(
                header,
                Style::default().fg(Color::DarkGray),
            )));
            for line in block.text_content().unwrap_or("").lines().take(5) {
                let truncated = truncate_str(line, width.saturating_sub(4));
                lines.push(Line::from(Span::styled(
                    format!("  {}", truncated),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
        }
        BlockType::Unknown => {
            lines.push(Line::from(Span::styled(
                format!("UNKNOWN ({})", block.event_type),
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            )));
        }
    }
}

fn render_result_lines(result: &DisplayBlock, lines: &mut Vec<Line<'static>>, width: usize) {
    let status = if result.is_error {
        Span::styled("[ERROR]", Style::default().fg(Color::Red))
    } else {
        Span::styled("[OK]", Style::default().fg(Color::Green))
    };
    lines.push(Line::from(vec![
        Span::styled("  RESULT ", Style::default().fg(Color::Blue)),
        status,
    ]));

    let text = match &result.content {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    let color = if result.is_error {
        Color::Red
    } else {
        Color::DarkGray
    };
    for line in text.lines().take(5) {
        let truncated = truncate_str(line, width.saturating_sub(4));
        lines.push(Line::from(Span::styled(
            format!("  {}", truncated),
            Style::default().fg(color),
        )));
    }
    let line_count = text.lines().count();
    if line_count > 5 {
        lines.push(Line::from(Span::styled(
            format!("  ... ({} more lines)", line_count - 5),
            Style::default().fg(Color::DarkGray),
        )));
    }
}
