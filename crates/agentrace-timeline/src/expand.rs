//! Block expander: maps one normalized event to primitive display blocks.
//!
//! The source format does not carry an explicit discriminant for local shell
//! commands, their output, or compaction summaries — they arrive as ordinary
//! user turns and are recognized by structural markers in the text. The
//! matchers below are total and side-effect free; their priority order (the
//! only tie-break) is: command echo, command output, compact summary, plain
//! text.

use crate::nav::truncate_with_ellipsis;
use crate::{BlockType, DisplayBlock, Role, SessionEvent};
use regex::Regex;
use serde_json::Value;

/// Maximum length of a label's `params` summary.
const PARAMS_MAX_LEN: usize = 60;

/// Expands events into primitive blocks. Construct once per compilation;
/// the marker patterns are compiled in `new`.
pub struct BlockExpander {
    command_name: Regex,
    command_args: Regex,
    command_stdout: Regex,
    command_stderr: Regex,
}

impl Default for BlockExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExpander {
    pub fn new() -> Self {
        Self {
            command_name: Regex::new(r"(?s)<command-name>(.*?)</command-name>").unwrap(),
            command_args: Regex::new(r"(?s)<command-args>(.*?)</command-args>").unwrap(),
            command_stdout: Regex::new(r"(?s)<local-command-stdout>(.*?)</local-command-stdout>")
                .unwrap(),
            command_stderr: Regex::new(r"(?s)<local-command-stderr>(.*?)</local-command-stderr>")
                .unwrap(),
        }
    }

    /// Expand one normalized event into an ordered list of primitive blocks.
    /// Usually one block; a multi-part turn yields one block per content
    /// element, each id suffixed with the element's index.
    pub fn expand(&self, event: &SessionEvent) -> Vec<DisplayBlock> {
        match event.event_type.as_str() {
            "user" => self.expand_user(event),
            "assistant" => self.expand_assistant(event),
            "summary" => vec![self.summary_block(event)],
            _ => vec![unknown_block(event)],
        }
    }

    fn expand_assistant(&self, event: &SessionEvent) -> Vec<DisplayBlock> {
        let Some(content) = event.payload.get("message").and_then(|m| m.get("content")) else {
            return vec![unknown_block(event)];
        };

        match content {
            Value::String(text) => {
                vec![text_block(event, event.id.clone(), Role::Assistant, text)]
            }
            Value::Array(elements) => {
                let mut blocks = Vec::new();
                for (idx, element) in elements.iter().enumerate() {
                    let id = sub_id(event, idx);
                    match element.get("type").and_then(Value::as_str) {
                        Some("text") => {
                            // Empty elements still get a block; nothing is
                            // dropped, and the renderer placeholder-handles
                            // empty content.
                            let text = element.get("text").and_then(Value::as_str).unwrap_or("");
                            blocks.push(text_block(event, id, Role::Assistant, text));
                        }
                        Some("thinking") => {
                            let text =
                                element.get("thinking").and_then(Value::as_str).unwrap_or("");
                            let mut block = DisplayBlock::new(
                                id,
                                BlockType::Thinking,
                                &event.event_type,
                                event.timestamp(),
                                "Thinking",
                            );
                            block.content = Value::String(text.to_string());
                            blocks.push(block);
                        }
                        Some("tool_use") => blocks.push(self.tool_use_block(event, id, element)),
                        _ => blocks.push(unknown_element_block(event, id, element)),
                    }
                }
                blocks
            }
            _ => vec![unknown_block(event)],
        }
    }

    fn expand_user(&self, event: &SessionEvent) -> Vec<DisplayBlock> {
        let Some(content) = event.payload.get("message").and_then(|m| m.get("content")) else {
            return vec![unknown_block(event)];
        };

        match content {
            Value::String(text) => vec![self.classify_user_text(event, text)],
            Value::Array(elements) => {
                let mut blocks = Vec::new();
                for (idx, element) in elements.iter().enumerate() {
                    let id = sub_id(event, idx);
                    match element.get("type").and_then(Value::as_str) {
                        Some("tool_result") => {
                            blocks.push(tool_result_block(event, id, element));
                        }
                        Some("text") => {
                            let text = element.get("text").and_then(Value::as_str).unwrap_or("");
                            blocks.push(text_block(event, id, Role::User, text));
                        }
                        _ => blocks.push(unknown_element_block(event, id, element)),
                    }
                }
                blocks
            }
            _ => vec![unknown_block(event)],
        }
    }

    /// Shape-match a user turn's string content. First match wins.
    fn classify_user_text(&self, event: &SessionEvent, text: &str) -> DisplayBlock {
        if let Some(captures) = self.command_name.captures(text) {
            let mut block = DisplayBlock::new(
                event.id.clone(),
                BlockType::LocalCommand,
                &event.event_type,
                event.timestamp(),
                "Local command",
            );
            let name = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let args = self
                .command_args
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty());
            let summary = match args {
                Some(args) => format!("{} {}", name, args),
                None => name.to_string(),
            };
            block.label.params = Some(truncate_with_ellipsis(&summary, PARAMS_MAX_LEN));
            block.content = Value::String(text.to_string());
            return block;
        }

        let stdout = self
            .command_stdout
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        let stderr = self
            .command_stderr
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        if stdout.is_some() || stderr.is_some() {
            let mut block = DisplayBlock::new(
                event.id.clone(),
                BlockType::LocalCommandOutput,
                &event.event_type,
                event.timestamp(),
                "Command output",
            );
            let mut parts = Vec::new();
            if let Some(out) = stdout.map(str::trim).filter(|s| !s.is_empty()) {
                parts.push(out.to_string());
            }
            if let Some(err) = stderr.map(str::trim).filter(|s| !s.is_empty()) {
                parts.push(err.to_string());
            }
            block.content = Value::String(parts.join("\n"));
            return block;
        }

        if event
            .payload
            .get("is_compact_summary")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            let mut block = DisplayBlock::new(
                event.id.clone(),
                BlockType::CompactSummary,
                &event.event_type,
                event.timestamp(),
                "Compact summary",
            );
            block.content = Value::String(text.to_string());
            return block;
        }

        text_block(event, event.id.clone(), Role::User, text)
    }

    fn tool_use_block(&self, event: &SessionEvent, id: String, element: &Value) -> DisplayBlock {
        let name = element
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("tool");
        let input = element.get("input").cloned().unwrap_or(Value::Null);

        let mut block = DisplayBlock::new(
            id,
            BlockType::ToolUse,
            &event.event_type,
            event.timestamp(),
            name,
        );
        block.label.params = tool_params(name, &input);
        block.tool_name = Some(name.to_string());
        block.correlation_id = element
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        block.content = input;
        block
    }

    fn summary_block(&self, event: &SessionEvent) -> DisplayBlock {
        match event.payload.get("summary").and_then(Value::as_str) {
            Some(summary) => {
                let mut block = DisplayBlock::new(
                    event.id.clone(),
                    BlockType::CompactSummary,
                    &event.event_type,
                    event.timestamp(),
                    "Compact summary",
                );
                block.content = Value::String(summary.to_string());
                block
            }
            None => unknown_block(event),
        }
    }
}

fn sub_id(event: &SessionEvent, idx: usize) -> String {
    format!("{}-{}", event.id, idx)
}

fn text_block(event: &SessionEvent, id: String, role: Role, text: &str) -> DisplayBlock {
    let label = match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    };
    let mut block = DisplayBlock::new(
        id,
        BlockType::Text,
        &event.event_type,
        event.timestamp(),
        label,
    );
    block.role = Some(role);
    block.content = Value::String(text.to_string());
    block
}

fn tool_result_block(event: &SessionEvent, id: String, element: &Value) -> DisplayBlock {
    let mut block = DisplayBlock::new(
        id,
        BlockType::ToolResult,
        &event.event_type,
        event.timestamp(),
        "Result",
    );
    block.correlation_id = element
        .get("tool_use_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    block.is_error = element
        .get("is_error")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    block.content = element.get("content").cloned().unwrap_or(Value::Null);
    block
}

/// Fallback for a whole event nothing else matched: raw payload preserved.
fn unknown_block(event: &SessionEvent) -> DisplayBlock {
    let mut block = DisplayBlock::new(
        event.id.clone(),
        BlockType::Unknown,
        &event.event_type,
        event.timestamp(),
        &event.event_type,
    );
    block.content = event.payload.clone();
    block
}

/// Fallback for one unrecognized content element inside a known turn.
fn unknown_element_block(event: &SessionEvent, id: String, element: &Value) -> DisplayBlock {
    let mut block = DisplayBlock::new(
        id,
        BlockType::Unknown,
        &event.event_type,
        event.timestamp(),
        &event.event_type,
    );
    block.content = element.clone();
    block
}

/// Short human-readable input summary for well-known tools, with a generic
/// key=value fallback for everything else.
fn tool_params(name: &str, input: &Value) -> Option<String> {
    let primary = match name {
        "Read" | "Write" | "Edit" => input.get("file_path").and_then(Value::as_str),
        "NotebookEdit" => input.get("notebook_path").and_then(Value::as_str),
        "Bash" => input.get("command").and_then(Value::as_str),
        "Grep" | "Glob" => input.get("pattern").and_then(Value::as_str),
        "WebFetch" => input.get("url").and_then(Value::as_str),
        "WebSearch" => input.get("query").and_then(Value::as_str),
        "Task" => input.get("description").and_then(Value::as_str),
        _ => None,
    };
    if let Some(s) = primary {
        return Some(truncate_with_ellipsis(s, PARAMS_MAX_LEN));
    }
    summarize_input(input)
}

fn summarize_input(input: &Value) -> Option<String> {
    let map = input.as_object().filter(|m| !m.is_empty())?;
    let parts: Vec<String> = map
        .iter()
        .take(3)
        .map(|(k, v)| {
            let val = match v {
                Value::String(s) => truncate_with_ellipsis(s, 24),
                other => truncate_with_ellipsis(&other.to_string(), 24),
            };
            format!("{}={}", k, val)
        })
        .collect();
    Some(truncate_with_ellipsis(&parts.join(" "), PARAMS_MAX_LEN))
}
