//! Navigation index and the viewport "active block" algorithm.
//!
//! The index is the ordered subsequence of primary user/assistant message
//! blocks, each with a short preview, feeding a sidebar mini-map. The active
//! entry is whichever indexed block currently intersects the viewport band
//! (top of the viewport down to 70% of its height); the algorithm is a pure
//! function over block extents so any observer mechanism can drive it.

use crate::{BlockType, DisplayBlock, MessageBlockInfo, Role};

/// Maximum preview length in bytes (truncated at a char boundary).
pub const PREVIEW_MAX_LEN: usize = 80;

/// Placeholder preview for a message with empty or non-textual content.
pub fn role_placeholder(role: Role) -> &'static str {
    match role {
        Role::User => "User message",
        Role::Assistant => "Assistant message",
    }
}

/// Extract the ordered navigation index from a compiled block sequence.
///
/// Only top-level `text` blocks with a user/assistant role qualify; grouped
/// and secondary blocks (tool activity, local commands, thinking) are
/// excluded. Order matches the compiled sequence.
pub fn message_index(blocks: &[DisplayBlock]) -> Vec<MessageBlockInfo> {
    blocks
        .iter()
        .filter(|b| b.block_type == BlockType::Text)
        .filter_map(|b| {
            let role = b.role?;
            Some(MessageBlockInfo {
                id: b.id.clone(),
                role,
                timestamp: b.timestamp,
                preview: preview_for(b, role),
            })
        })
        .collect()
}

fn preview_for(block: &DisplayBlock, role: Role) -> String {
    match block.text_content().map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => {
            let first_line = text.lines().next().unwrap_or(text);
            truncate_with_ellipsis(first_line, PREVIEW_MAX_LEN)
        }
        None => role_placeholder(role).to_string(),
    }
}

/// Truncate a string to `max_len` bytes, respecting char boundaries and
/// appending "..." when anything was cut. Bounds too small to carry the
/// ellipsis just hard-truncate.
pub(crate) fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let mut end = max_len - 3;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

/// The band of the viewport that decides the active navigation entry.
/// Coordinates are rows (or pixels) relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportBand {
    pub top: i64,
    pub bottom: i64,
}

impl ViewportBand {
    /// The default band: top of the viewport down to 70% of its height.
    pub fn for_height(height: i64) -> Self {
        Self {
            top: 0,
            bottom: height * 7 / 10,
        }
    }
}

/// A rendered block's vertical extent, relative to the viewport top.
#[derive(Debug, Clone, Copy)]
pub struct VisibleBlock<'a> {
    pub id: &'a str,
    pub top: i64,
    pub bottom: i64,
}

/// The single active block: the first (topmost in sequence) block whose
/// extent intersects the band. Returns `None` when nothing intersects,
/// e.g. after the blocks were unmounted.
pub fn active_block<'a>(band: ViewportBand, visible: &[VisibleBlock<'a>]) -> Option<&'a str> {
    visible
        .iter()
        .find(|b| b.bottom > band.top && b.top < band.bottom)
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn text_block(id: &str, role: Option<Role>, text: &str) -> DisplayBlock {
        let mut block = DisplayBlock::new(
            id.to_string(),
            BlockType::Text,
            "user",
            DateTime::UNIX_EPOCH,
            "User",
        );
        block.role = role;
        block.content = serde_json::Value::String(text.to_string());
        block
    }

    fn tool_block(id: &str) -> DisplayBlock {
        DisplayBlock::new(
            id.to_string(),
            BlockType::ToolGroup,
            "assistant",
            DateTime::UNIX_EPOCH,
            "Read",
        )
    }

    #[test]
    fn index_is_subsequence_of_primary_blocks() {
        let blocks = vec![
            text_block("b1", Some(Role::User), "first question"),
            tool_block("b2"),
            text_block("b3", Some(Role::Assistant), "the answer"),
        ];
        let index = message_index(&blocks);
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].id, "b1");
        assert_eq!(index[0].role, Role::User);
        assert_eq!(index[1].id, "b3");
        assert_eq!(index[1].role, Role::Assistant);
    }

    #[test]
    fn text_block_without_role_excluded() {
        let blocks = vec![text_block("b1", None, "orphan text")];
        assert!(message_index(&blocks).is_empty());
    }

    #[test]
    fn preview_is_first_line_truncated() {
        let blocks = vec![text_block(
            "b1",
            Some(Role::User),
            "first line\nsecond line",
        )];
        assert_eq!(message_index(&blocks)[0].preview, "first line");

        let long = "x".repeat(100);
        let blocks = vec![text_block("b2", Some(Role::User), &long)];
        let preview = &message_index(&blocks)[0].preview;
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= PREVIEW_MAX_LEN);
    }

    #[test]
    fn empty_content_gets_placeholder() {
        let blocks = vec![
            text_block("b1", Some(Role::User), "   "),
            text_block("b2", Some(Role::Assistant), ""),
        ];
        let index = message_index(&blocks);
        assert_eq!(index[0].preview, "User message");
        assert_eq!(index[1].preview, "Assistant message");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = format!("{}\u{2192}tail", "x".repeat(76));
        let result = truncate_with_ellipsis(&text, 80);
        assert!(result.ends_with("..."));
        assert!(result.is_char_boundary(result.len() - 3));
    }

    #[test]
    fn truncate_never_exceeds_small_bounds() {
        assert_eq!(truncate_with_ellipsis("hello", 3), "hel");
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("\u{2192}\u{2192}", 2), "");
    }

    #[test]
    fn active_block_first_intersecting_wins() {
        let band = ViewportBand::for_height(100); // band: 0..70
        let visible = [
            VisibleBlock {
                id: "above",
                top: -30,
                bottom: -10,
            },
            VisibleBlock {
                id: "in-band",
                top: 5,
                bottom: 25,
            },
            VisibleBlock {
                id: "also-in-band",
                top: 30,
                bottom: 60,
            },
        ];
        assert_eq!(active_block(band, &visible), Some("in-band"));
    }

    #[test]
    fn active_block_partially_overlapping_counts() {
        let band = ViewportBand::for_height(100);
        // Starts above the viewport but extends into the band.
        let visible = [VisibleBlock {
            id: "straddling",
            top: -50,
            bottom: 10,
        }];
        assert_eq!(active_block(band, &visible), Some("straddling"));
    }

    #[test]
    fn active_block_below_band_ignored() {
        let band = ViewportBand::for_height(100);
        let visible = [VisibleBlock {
            id: "below",
            top: 80,
            bottom: 95,
        }];
        assert_eq!(active_block(band, &visible), None);
    }

    #[test]
    fn active_block_empty_set() {
        let band = ViewportBand::for_height(100);
        assert_eq!(active_block(band, &[]), None);
    }
}
