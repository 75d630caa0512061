//! The timeline compiler: event array in, renderable tree out.
//!
//! Passes run in a fixed order — sort, normalize, expand, group, plan-link —
//! and every pass is total, so compilation never fails and never drops data.
//! Identical input arrays compile to identical timelines, ids included.

use crate::{
    extract_plan_links, group_blocks, message_index, BlockExpander, BlockType, DisplayBlock,
    MessageBlockInfo, SessionEvent,
};

/// A compiled session: the display tree plus its navigation index.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub blocks: Vec<DisplayBlock>,
    pub messages: Vec<MessageBlockInfo>,
}

/// Compile a session's event log into a timeline.
///
/// Events are stably sorted by timestamp first, so out-of-order retrieval
/// cannot change the output; ties (including events with no timestamp)
/// keep their input order. Synthetic ids for id-less events are keyed on
/// the input position, not the sorted position.
pub fn compile(events: &[SessionEvent]) -> Timeline {
    let mut ordered: Vec<(usize, &SessionEvent)> = events.iter().enumerate().collect();
    ordered.sort_by_key(|(_, event)| event.timestamp());

    let expander = BlockExpander::new();
    let mut primitives = Vec::with_capacity(ordered.len());
    for (ordinal, event) in ordered {
        let event = crate::normalize(event.clone(), ordinal);
        primitives.extend(expander.expand(&event));
    }

    let mut blocks = group_blocks(primitives);
    for block in &mut blocks {
        if block.block_type == BlockType::AgentraceTool {
            block.plan_links = extract_plan_links(block);
        }
    }

    let messages = message_index(&blocks);
    Timeline { blocks, messages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{read_events_from_str, Role};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap()
    }

    fn event(id: &str, event_type: &str, payload: serde_json::Value, minute: u32) -> SessionEvent {
        SessionEvent {
            id: id.to_string(),
            session_id: "sess-1".to_string(),
            event_type: event_type.to_string(),
            payload,
            created_at: Some(ts(minute)),
        }
    }

    fn user_text(id: &str, text: &str, minute: u32) -> SessionEvent {
        event(
            id,
            "user",
            json!({"message": {"role": "user", "content": text}}),
            minute,
        )
    }

    #[test]
    fn empty_input_compiles_to_empty_timeline() {
        let timeline = compile(&[]);
        assert!(timeline.blocks.is_empty());
        assert!(timeline.messages.is_empty());
    }

    #[test]
    fn compilation_is_deterministic() {
        let events = vec![
            user_text("e1", "question", 0),
            event(
                "e2",
                "assistant",
                json!({"message": {"role": "assistant", "content": [
                    {"type": "text", "text": "answer"},
                    {"type": "tool_use", "id": "tc1", "name": "Read",
                     "input": {"file_path": "src/main.rs"}},
                ]}}),
                1,
            ),
        ];
        assert_eq!(compile(&events), compile(&events));
    }

    #[test]
    fn out_of_order_events_sorted_by_timestamp() {
        let events = vec![user_text("e2", "second", 5), user_text("e1", "first", 1)];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks[0].id, "e1");
        assert_eq!(timeline.blocks[1].id, "e2");
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let events = vec![user_text("a", "one", 1), user_text("b", "two", 1)];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks[0].id, "a");
        assert_eq!(timeline.blocks[1].id, "b");
    }

    #[test]
    fn tool_call_and_result_compile_to_one_group() {
        let events = vec![
            event(
                "e1",
                "assistant",
                json!({"message": {"role": "assistant", "content": [
                    {"type": "tool_use", "id": "tc1", "name": "Bash",
                     "input": {"command": "cargo test"}},
                ]}}),
                0,
            ),
            event(
                "e2",
                "user",
                json!({"message": {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "tc1",
                     "content": "all tests passed"},
                ]}}),
                1,
            ),
        ];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks.len(), 1);
        let group = &timeline.blocks[0];
        assert_eq!(group.block_type, BlockType::ToolGroup);
        assert_eq!(group.tool_name.as_deref(), Some("Bash"));
        assert_eq!(group.tool_result_block().unwrap().id, "e2-0");
        // Tool activity stays out of the message index
        assert!(timeline.messages.is_empty());
    }

    #[test]
    fn plan_tool_gets_links() {
        let events = vec![
            event(
                "e1",
                "assistant",
                json!({"message": {"role": "assistant", "content": [
                    {"type": "tool_use", "id": "tc1",
                     "name": "mcp__agentrace__update_plan",
                     "input": {"plan_id": "p-9", "field": "status", "value": "complete"}},
                ]}}),
                0,
            ),
            event(
                "e2",
                "user",
                json!({"message": {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "tc1", "content": "ok"},
                ]}}),
                1,
            ),
        ];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks[0].block_type, BlockType::AgentraceTool);
        assert_eq!(timeline.blocks[0].plan_links.len(), 1);
        assert_eq!(timeline.blocks[0].plan_links[0].id, "p-9");
        assert_eq!(
            timeline.blocks[0].plan_links[0].changed_status.as_deref(),
            Some("complete")
        );
    }

    #[test]
    fn message_index_covers_primary_blocks_in_order() {
        let events = vec![
            user_text("e1", "first question", 0),
            event(
                "e2",
                "assistant",
                json!({"message": {"role": "assistant", "content": "the answer"}}),
                1,
            ),
            user_text("e3", "follow-up", 2),
        ];
        let timeline = compile(&events);
        let roles: Vec<Role> = timeline.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(timeline.messages[0].preview, "first question");
    }

    #[test]
    fn malformed_payload_degrades_to_unknown_block() {
        let events = vec![event("e1", "assistant", json!({"message": 42}), 0)];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks.len(), 1);
        assert_eq!(timeline.blocks[0].block_type, BlockType::Unknown);
        // Raw payload preserved for fallback rendering
        assert_eq!(timeline.blocks[0].content, json!({"message": 42}));
    }

    #[test]
    fn leaf_count_matches_input_content_elements() {
        let events = vec![event(
            "e1",
            "assistant",
            json!({"message": {"role": "assistant", "content": [
                {"type": "text", "text": ""},
                {"type": "thinking", "thinking": ""},
                {"type": "text", "text": "visible"},
            ]}}),
            0,
        )];
        let timeline = compile(&events);
        // One block per input content element, empty ones included
        assert_eq!(timeline.blocks.len(), 3);
        assert_eq!(timeline.blocks[0].id, "e1-0");
        assert_eq!(timeline.blocks[2].id, "e1-2");
    }

    #[test]
    fn missing_ids_yield_identical_block_ids_across_compilations() {
        let no_id = |text: &str, minute: u32| SessionEvent {
            id: String::new(),
            session_id: "sess-1".to_string(),
            event_type: "user".to_string(),
            payload: json!({"message": {"role": "user", "content": text}}),
            created_at: Some(ts(minute)),
        };
        // Out of order on purpose: synthetic ids key on the input position,
        // not the sorted position.
        let events = vec![no_id("later", 5), no_id("earlier", 1)];

        let first = compile(&events);
        let second = compile(&events);
        assert_eq!(first, second);

        assert_eq!(first.blocks.len(), 2);
        assert_eq!(first.messages[0].preview, "earlier");
        assert!(!first.blocks[0].id.is_empty());
        assert!(!first.blocks[1].id.is_empty());
        assert_ne!(first.blocks[0].id, first.blocks[1].id);
    }

    #[test]
    fn no_event_is_ever_dropped() {
        let events = vec![
            user_text("e1", "hello", 0),
            event("e2", "wild_new_type", json!({"data": true}), 1),
            event(
                "e3",
                "user",
                json!({"message": {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "nothing-matches",
                     "content": "orphan"},
                ]}}),
                2,
            ),
        ];
        let timeline = compile(&events);
        assert_eq!(timeline.blocks.len(), 3);
    }

    #[test]
    fn end_to_end_from_json_source() {
        let raw = r#"[
            {"id":"e1","session_id":"s1","event_type":"user",
             "payload":{"message":{"role":"user","content":"<command-name>/clear</command-name><command-args></command-args>"}},
             "created_at":"2026-03-01T10:00:00Z"},
            {"id":"e2","session_id":"s1","event_type":"user",
             "payload":{"message":{"role":"user","content":"<local-command-stdout>cleared</local-command-stdout>"}},
             "created_at":"2026-03-01T10:00:01Z"},
            {"id":"e3","session_id":"s1","event_type":"user",
             "payload":{"message":{"role":"user","content":"real question"}},
             "created_at":"2026-03-01T10:00:02Z"}
        ]"#;
        let events = read_events_from_str(raw).unwrap();
        let timeline = compile(&events);

        assert_eq!(timeline.blocks.len(), 2);
        assert_eq!(timeline.blocks[0].block_type, BlockType::LocalCommandGroup);
        assert_eq!(timeline.blocks[0].child_blocks.len(), 1);
        assert_eq!(timeline.blocks[1].block_type, BlockType::Text);
        assert_eq!(timeline.messages.len(), 1);
        assert_eq!(timeline.messages[0].preview, "real question");
    }
}
