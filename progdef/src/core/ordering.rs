//! Canonical block order and block slices.
//!
//! A block list is in canonical order when every enumerator block is
//! immediately followed by all of its repeated and nested repeated blocks.

use crate::core::block_tree::BlockTree;
use crate::core::types::{BlockId, BlockSlice};
use crate::program::BlockDefinition;

/// True if `blocks` is already in canonical order.
///
/// Walks the list once with a stack of open enumerator ids. Each block must be
/// repeated under the innermost enumerator still open after popping, or be
/// top-level with no enumerator left open.
pub fn is_canonical(blocks: &[BlockDefinition]) -> bool {
    let mut open_enumerators: Vec<BlockId> = Vec::new();
    for block in blocks {
        while let Some(&top) = open_enumerators.last() {
            if block.enumerator_id == Some(top) {
                break;
            }
            open_enumerators.pop();
        }
        if block.enumerator_id != open_enumerators.last().copied() {
            return false;
        }
        if block.is_enumerator {
            open_enumerators.push(block.id);
        }
    }
    true
}

/// Reorder `blocks` canonically.
///
/// Top-level blocks keep their relative order; each is followed depth-first by
/// its repeated blocks, which also keep their relative order. Blocks that are
/// not reachable from a top-level block are dropped.
pub fn canonical_order(blocks: &[BlockDefinition]) -> Vec<BlockDefinition> {
    BlockTree::build(blocks)
        .preorder()
        .into_iter()
        .map(|index| blocks[index].clone())
        .collect()
}

/// Slice covering `block_id` and its repeated descendants.
///
/// `blocks` must be in canonical order. Returns `None` if no block has the id.
pub fn block_slice(blocks: &[BlockDefinition], block_id: BlockId) -> Option<BlockSlice> {
    let tree = BlockTree::build(blocks);
    let start = tree.index_of(block_id)?;
    Some(BlockSlice::new(start, start + tree.subtree_len(start)))
}
