//! Permalink fragments and their resolution against a compiled tree.
//!
//! A permalink names a block by URL fragment, `event-<blockId>`. Because
//! block ids derive deterministically from event ids, a fragment captured
//! from one compilation resolves against any later compilation of the same
//! session. Resolution covers nested blocks too, so a link to a grouped
//! tool result still lands on its enclosing top-level block.

use crate::DisplayBlock;

/// Fragment prefix for block permalinks.
pub const FRAGMENT_PREFIX: &str = "event-";

/// The URL fragment (without `#`) addressing a block id.
pub fn fragment_for(block_id: &str) -> String {
    format!("{FRAGMENT_PREFIX}{block_id}")
}

/// Parse a fragment back into a block id. Accepts an optional leading `#`;
/// anything not carrying the prefix is not a block permalink.
pub fn block_id_from_fragment(fragment: &str) -> Option<&str> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    fragment
        .strip_prefix(FRAGMENT_PREFIX)
        .filter(|id| !id.is_empty())
}

/// Location of a block inside a compiled sequence: the top-level index,
/// plus the child index when the id names a nested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub index: usize,
    pub child: Option<usize>,
}

/// Id-to-position map over one compiled block sequence.
///
/// Built once per compilation; lookups are O(1). Nested children map to
/// their parent's top-level index so scroll targets are always a top-level
/// block.
#[derive(Debug, Default)]
pub struct PermalinkIndex {
    refs: std::collections::HashMap<String, BlockRef>,
}

impl PermalinkIndex {
    pub fn build(blocks: &[DisplayBlock]) -> Self {
        let mut refs = std::collections::HashMap::new();
        for (index, block) in blocks.iter().enumerate() {
            refs.entry(block.id.clone())
                .or_insert(BlockRef { index, child: None });
            for (child, nested) in block.child_blocks.iter().enumerate() {
                refs.entry(nested.id.clone()).or_insert(BlockRef {
                    index,
                    child: Some(child),
                });
            }
        }
        Self { refs }
    }

    /// Position of the block with this id, if present.
    pub fn lookup(&self, block_id: &str) -> Option<BlockRef> {
        self.refs.get(block_id).copied()
    }

    /// Resolve a URL fragment to a block position. `None` for foreign
    /// fragments and for ids from a different session.
    pub fn resolve(&self, fragment: &str) -> Option<BlockRef> {
        self.lookup(block_id_from_fragment(fragment)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockType;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn block(id: &str) -> DisplayBlock {
        DisplayBlock::new(
            id.to_string(),
            BlockType::Text,
            "user",
            DateTime::UNIX_EPOCH,
            "User",
        )
    }

    #[test]
    fn fragment_round_trips() {
        let fragment = fragment_for("e1-0");
        assert_eq!(fragment, "event-e1-0");
        assert_eq!(block_id_from_fragment(&fragment), Some("e1-0"));
        assert_eq!(block_id_from_fragment("#event-e1-0"), Some("e1-0"));
    }

    #[test]
    fn foreign_fragment_rejected() {
        assert_eq!(block_id_from_fragment("section-intro"), None);
        assert_eq!(block_id_from_fragment("event-"), None);
        assert_eq!(block_id_from_fragment(""), None);
    }

    #[test]
    fn top_level_lookup() {
        let blocks = vec![block("a"), block("b")];
        let index = PermalinkIndex::build(&blocks);
        assert_eq!(
            index.lookup("b"),
            Some(BlockRef {
                index: 1,
                child: None
            })
        );
        assert_eq!(index.lookup("missing"), None);
    }

    #[test]
    fn nested_child_resolves_to_parent_index() {
        let mut group = block("u1");
        group.block_type = BlockType::ToolGroup;
        group.child_blocks.push(block("r1"));
        let blocks = vec![block("a"), group];

        let index = PermalinkIndex::build(&blocks);
        assert_eq!(
            index.resolve("event-r1"),
            Some(BlockRef {
                index: 1,
                child: Some(0)
            })
        );
    }

    #[test]
    fn resolve_full_fragment() {
        let blocks = vec![block("e1-2")];
        let index = PermalinkIndex::build(&blocks);
        assert_eq!(
            index.resolve("#event-e1-2"),
            Some(BlockRef {
                index: 0,
                child: None
            })
        );
        assert_eq!(index.resolve("event-other"), None);
    }
}
