//! Display block types — the nodes of the compiled timeline tree.
//!
//! Blocks serialize camelCase for the rendering layer. The reference from a
//! tool group to its paired result is modeled as an index into the group's
//! own `child_blocks`, keeping a single ownership path through the tree.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Visual treatment category for one compiled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Text,
    Thinking,
    ToolUse,
    ToolResult,
    ToolGroup,
    /// A tool group recognized as the session's own plan-management tool.
    AgentraceTool,
    LocalCommand,
    LocalCommandOutput,
    LocalCommandGroup,
    CompactSummary,
    Unknown,
}

/// Speaker role for primary message blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Short header shown on a rendered block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockLabel {
    pub text: String,
    /// Optional human-readable summary of the block's input, e.g. a
    /// truncated file path for a tool call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

/// Cross-reference from a plan-tool block to an externally stored plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanLinkInfo {
    /// Plan document identifier, resolved externally.
    pub id: String,
    /// New status value when the operation changed the plan's status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_status: Option<String>,
}

/// One node of the compiled, renderable timeline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBlock {
    /// Unique within one compiled tree; derives deterministically from the
    /// originating event id plus a content-block index, so it doubles as a
    /// permalink target.
    pub id: String,
    pub block_type: BlockType,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub label: BlockLabel,
    /// Type-dependent content: message text as a JSON string, tool input as
    /// an object, raw payload for unknown blocks.
    #[schemars(schema_with = "crate::schema::any_value_schema")]
    pub content: serde_json::Value,
    /// Grouped children, in source event order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_blocks: Vec<DisplayBlock>,
    /// Index of the paired tool result inside `child_blocks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result_index: Option<usize>,
    /// Always present, empty for anything that is not a plan-tool block.
    #[serde(default)]
    pub plan_links: Vec<PlanLinkInfo>,
    /// Set on primary user/assistant message blocks; feeds navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Tool name for `tool_use`/`tool_group` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Correlation identifier linking a tool call to its result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Error flag carried by `tool_result` blocks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl DisplayBlock {
    /// A bare block with the given identity; callers fill content and
    /// type-specific fields afterwards.
    pub fn new(
        id: String,
        block_type: BlockType,
        event_type: &str,
        timestamp: DateTime<Utc>,
        label_text: &str,
    ) -> Self {
        Self {
            id,
            block_type,
            event_type: event_type.to_string(),
            timestamp,
            label: BlockLabel {
                text: label_text.to_string(),
                params: None,
            },
            content: serde_json::Value::Null,
            child_blocks: Vec::new(),
            tool_result_index: None,
            plan_links: Vec::new(),
            role: None,
            tool_name: None,
            correlation_id: None,
            is_error: false,
        }
    }

    /// The paired tool result, when this block is a tool group.
    pub fn tool_result_block(&self) -> Option<&DisplayBlock> {
        self.tool_result_index
            .and_then(|i| self.child_blocks.get(i))
    }

    /// Text content, when the block carries plain text.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_str()
    }
}

/// One navigation entry per primary user/assistant message block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageBlockInfo {
    pub id: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    pub preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_serializes_camel_case() {
        let block = DisplayBlock::new(
            "e1".to_string(),
            BlockType::ToolUse,
            "assistant",
            DateTime::UNIX_EPOCH,
            "Read",
        );
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"blockType\":\"tool_use\""));
        assert!(json.contains("\"eventType\""));
        assert!(json.contains("\"planLinks\":[]"));
        // Empty/default fields stay off the wire
        assert!(!json.contains("childBlocks"));
        assert!(!json.contains("isError"));
    }

    #[test]
    fn tool_result_block_lookup() {
        let mut group = DisplayBlock::new(
            "e1".to_string(),
            BlockType::ToolGroup,
            "assistant",
            DateTime::UNIX_EPOCH,
            "Read",
        );
        let result = DisplayBlock::new(
            "e2".to_string(),
            BlockType::ToolResult,
            "user",
            DateTime::UNIX_EPOCH,
            "Result",
        );
        group.child_blocks.push(result);
        group.tool_result_index = Some(0);

        assert_eq!(group.tool_result_block().unwrap().id, "e2");
    }

    #[test]
    fn tool_result_block_absent() {
        let block = DisplayBlock::new(
            "e1".to_string(),
            BlockType::ToolUse,
            "assistant",
            DateTime::UNIX_EPOCH,
            "Read",
        );
        assert!(block.tool_result_block().is_none());
    }

    #[test]
    fn block_round_trips() {
        let mut block = DisplayBlock::new(
            "e1-0".to_string(),
            BlockType::Text,
            "user",
            DateTime::UNIX_EPOCH,
            "User",
        );
        block.role = Some(Role::User);
        block.content = serde_json::Value::String("hello".to_string());

        let json = serde_json::to_string(&block).unwrap();
        let parsed: DisplayBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
    }
}
