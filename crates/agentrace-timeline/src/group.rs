//! Pairing and grouping passes over the primitive block sequence.
//!
//! Three rewrites, applied in order:
//! 1. tool pairing — each `tool_use` claims the first later unmatched
//!    `tool_result` with the same correlation id,
//! 2. local-command grouping — a command echo absorbs its contiguous
//!    output/summary blocks,
//! 3. plan-tool recognition — tool groups belonging to the session's own
//!    plan-management tool are re-tagged.
//!
//! No block is ever dropped: unmatched calls and results stay standalone.

use crate::{is_plan_tool, BlockType, DisplayBlock};

/// Rewrite the primitive sequence into the final top-level block sequence.
pub fn group_blocks(blocks: Vec<DisplayBlock>) -> Vec<DisplayBlock> {
    let paired = pair_tool_results(blocks);
    let grouped = group_local_commands(paired);
    recognize_plan_tools(grouped)
}

/// Pair each `tool_use` with its result. The scan covers the entire
/// remainder of the sequence — a result may be separated from its call by
/// interleaved calls, and sessions are small enough that a look-ahead
/// window would only create false standalones. With duplicate correlation
/// ids (malformed logs) the earliest unmatched call claims the earliest
/// remaining result, and a consumed result is never reused.
fn pair_tool_results(blocks: Vec<DisplayBlock>) -> Vec<DisplayBlock> {
    let mut slots: Vec<Option<DisplayBlock>> = blocks.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(slots.len());

    for i in 0..slots.len() {
        let Some(block) = slots[i].take() else {
            continue;
        };
        if block.block_type == BlockType::ToolUse {
            let correlation = block
                .correlation_id
                .clone()
                .filter(|c| !c.is_empty());
            if let Some(correlation) = correlation {
                let matched = (i + 1..slots.len()).find(|&j| {
                    slots[j].as_ref().is_some_and(|b| {
                        b.block_type == BlockType::ToolResult
                            && b.correlation_id.as_deref() == Some(correlation.as_str())
                    })
                });
                if let Some(j) = matched {
                    if let Some(result) = slots[j].take() {
                        out.push(into_tool_group(block, result));
                        continue;
                    }
                }
            }
        }
        out.push(block);
    }
    out
}

/// The group adopts the call's id, label, and content — the group *is* the
/// call, enriched with its result as a child. This keeps ids unique and
/// keeps a permalink taken while the call was still in progress valid.
fn into_tool_group(call: DisplayBlock, result: DisplayBlock) -> DisplayBlock {
    let mut group = call;
    group.block_type = BlockType::ToolGroup;
    group.child_blocks.push(result);
    group.tool_result_index = Some(group.child_blocks.len() - 1);
    group
}

/// Fold every `local_command` plus its contiguous trailing output/summary
/// blocks into one `local_command_group`. Zero trailing blocks still folds,
/// so the renderer has a single code path for shell activity.
fn group_local_commands(blocks: Vec<DisplayBlock>) -> Vec<DisplayBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();

    while let Some(block) = iter.next() {
        if block.block_type != BlockType::LocalCommand {
            out.push(block);
            continue;
        }
        let mut group = block;
        group.block_type = BlockType::LocalCommandGroup;
        while iter.peek().is_some_and(|b| {
            matches!(
                b.block_type,
                BlockType::LocalCommandOutput | BlockType::CompactSummary
            )
        }) {
            if let Some(child) = iter.next() {
                group.child_blocks.push(child);
            }
        }
        out.push(group);
    }
    out
}

fn recognize_plan_tools(mut blocks: Vec<DisplayBlock>) -> Vec<DisplayBlock> {
    for block in &mut blocks {
        if block.block_type == BlockType::ToolGroup
            && block.tool_name.as_deref().is_some_and(is_plan_tool)
        {
            block.block_type = BlockType::AgentraceTool;
        }
    }
    blocks
}
