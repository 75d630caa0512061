//! Link command - Resolve a block id to its permalink fragment.

use agentrace_timeline::{block_id_from_fragment, fragment_for, PermalinkIndex};
use anyhow::Result;
use std::path::Path;

use super::load_timeline;

/// Accepts either a bare block id or an existing `event-<id>` fragment
/// (with or without the leading `#`) and prints the canonical fragment plus
/// the block's position. Exits nonzero when the id is not in the tree.
pub fn run(path: &Path, target: &str) -> Result<()> {
    let timeline = load_timeline(path)?;
    let index = PermalinkIndex::build(&timeline.blocks);

    let block_id = block_id_from_fragment(target).unwrap_or(target);
    let Some(block_ref) = index.lookup(block_id) else {
        anyhow::bail!("no block with id '{}' in this session", block_id);
    };

    println!("#{}", fragment_for(block_id));
    match block_ref.child {
        Some(child) => println!("block {} (child {})", block_ref.index, child),
        None => println!("block {}", block_ref.index),
    }
    Ok(())
}
