//! Plan link extraction for the session's own plan-management tool.
//!
//! The coding agent manages plan documents through a dedicated tool family;
//! timeline blocks for those calls are cross-linked to the plans they touch
//! so the UI can render a jump link and, for status changes, the resulting
//! status. Extraction is a read-only derivation over the call's input
//! arguments and result payload.

use crate::{DisplayBlock, PlanLinkInfo};
use serde_json::Value;

pub const PLAN_CREATE_TOOL: &str = "mcp__agentrace__create_plan";
pub const PLAN_UPDATE_TOOL: &str = "mcp__agentrace__update_plan";

/// Whether a tool name belongs to the plan-management family.
pub fn is_plan_tool(name: &str) -> bool {
    name == PLAN_CREATE_TOOL || name == PLAN_UPDATE_TOOL
}

/// Derive plan links for a recognized plan-tool block.
///
/// Plan ids come from the call's `plan_id` argument (update) and from the
/// result payload's `id`/`plan_id`/`plan.id` (create returns the new id in
/// its result). A status change surfaces when the update targeted the
/// `status` field, or when the result payload reports `changed_status`.
/// An errored result contributes nothing: the operation changed no plan.
pub fn extract_plan_links(block: &DisplayBlock) -> Vec<PlanLinkInfo> {
    let mut ids: Vec<String> = Vec::new();
    let mut changed_status: Option<String> = None;

    let input = &block.content;
    if let Some(id) = input.get("plan_id").and_then(Value::as_str) {
        push_unique(&mut ids, id);
    }
    if block.tool_name.as_deref() == Some(PLAN_UPDATE_TOOL)
        && input.get("field").and_then(Value::as_str) == Some("status")
    {
        changed_status = input
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_string);
    }

    if let Some(result) = block.tool_result_block().filter(|r| !r.is_error) {
        if let Some(payload) = result_payload(&result.content) {
            for key in ["id", "plan_id"] {
                if let Some(id) = payload.get(key).and_then(Value::as_str) {
                    push_unique(&mut ids, id);
                }
            }
            if let Some(id) = payload
                .get("plan")
                .and_then(|p| p.get("id"))
                .and_then(Value::as_str)
            {
                push_unique(&mut ids, id);
            }
            if changed_status.is_none() {
                changed_status = payload
                    .get("changed_status")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
        }
    }
    if block.tool_result_block().is_some_and(|r| r.is_error) {
        // A failed call changed nothing, whatever the input asked for.
        changed_status = None;
    }

    ids.into_iter()
        .map(|id| PlanLinkInfo {
            id,
            changed_status: changed_status.clone(),
        })
        .collect()
}

/// Interpret a tool result's content as a JSON object. Results arrive as an
/// object, as JSON serialized into a string, or as an array of text
/// elements; non-JSON text yields nothing and is rendered as plain text.
fn result_payload(content: &Value) -> Option<Value> {
    match content {
        Value::Object(_) => Some(content.clone()),
        Value::String(s) => serde_json::from_str(s.trim()).ok(),
        Value::Array(elements) => elements
            .iter()
            .find_map(|el| el.get("text").and_then(Value::as_str))
            .and_then(|s| serde_json::from_str(s.trim()).ok()),
        _ => None,
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}
