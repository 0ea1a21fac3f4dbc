//! Structural edits on canonically ordered block lists.
//!
//! Every function here takes a list in canonical order and returns a new
//! list; the input is never modified. Predicate validation of the result is
//! left to the caller.

use std::collections::HashSet;

use crate::core::block_tree::BlockTree;
use crate::core::types::{BlockId, BlockSlice, Direction};
use crate::program::BlockDefinition;

/// Why a structural edit could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    /// No block has this id, or the named enumerator is not an enumerator.
    MissingBlock(BlockId),
    /// The id is used by more than one block.
    DuplicateBlock(BlockId),
    /// The block's slice and its neighbor's slice do not touch.
    NonAdjacentSlices(BlockId),
}

/// Result of moving a block within its sibling group.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// No sibling in the requested direction; nothing changed.
    AtBoundary,
    /// The block's slice and its neighbor's slice were swapped.
    Moved(Vec<BlockDefinition>),
}

/// Position at which `new_block` keeps the list canonical.
///
/// Top-level blocks go at the end. Repeated blocks go right after the last
/// repeated or nested repeated block of their enumerator. Fails if the id is
/// already taken or the named enumerator does not exist or is not an
/// enumerator.
pub fn insertion_index(
    blocks: &[BlockDefinition],
    new_block: &BlockDefinition,
) -> Result<usize, MutationError> {
    if blocks.iter().any(|block| block.id == new_block.id) {
        return Err(MutationError::DuplicateBlock(new_block.id));
    }
    let Some(enumerator_id) = new_block.enumerator_id else {
        return Ok(blocks.len());
    };
    let tree = BlockTree::build(blocks);
    match tree.index_of(enumerator_id) {
        Some(index) if blocks[index].is_enumerator => Ok(slice_at(&tree, index).end),
        _ => Err(MutationError::MissingBlock(enumerator_id)),
    }
}

/// Copy of `blocks` with `new_block` inserted at its canonical position.
pub fn insert_block(
    blocks: &[BlockDefinition],
    new_block: BlockDefinition,
) -> Result<Vec<BlockDefinition>, MutationError> {
    let index = insertion_index(blocks, &new_block)?;
    let mut inserted = Vec::with_capacity(blocks.len() + 1);
    inserted.extend_from_slice(&blocks[..index]);
    inserted.push(new_block);
    inserted.extend_from_slice(&blocks[index..]);
    Ok(inserted)
}

/// Move `block_id` and its repeated descendants past the adjacent sibling
/// slice in `direction`.
///
/// Fails if no block has the id, or if any id in the list repeats, since
/// slices are then ambiguous.
pub fn move_block(
    blocks: &[BlockDefinition],
    block_id: BlockId,
    direction: Direction,
) -> Result<MoveOutcome, MutationError> {
    if let Some(duplicate) = first_duplicate_id(blocks) {
        return Err(MutationError::DuplicateBlock(duplicate));
    }
    let tree = BlockTree::build(blocks);
    let index = tree
        .index_of(block_id)
        .ok_or(MutationError::MissingBlock(block_id))?;
    let slice = slice_at(&tree, index);
    let Some(neighbor) = neighbor_index(blocks, slice, direction) else {
        return Ok(MoveOutcome::AtBoundary);
    };
    let neighbor_slice = slice_at(&tree, neighbor);
    swap_slices(blocks, slice, neighbor_slice)
        .map(MoveOutcome::Moved)
        .ok_or(MutationError::NonAdjacentSlices(block_id))
}

/// First id that appears on more than one block, in list order.
pub fn first_duplicate_id(blocks: &[BlockDefinition]) -> Option<BlockId> {
    let mut seen = HashSet::with_capacity(blocks.len());
    blocks
        .iter()
        .map(|block| block.id)
        .find(|&id| !seen.insert(id))
}

/// Index of the sibling to swap with, if any.
///
/// Up scans back for the nearest block sharing the enumerator. Down only
/// looks at the block right after the slice.
pub fn neighbor_index(
    blocks: &[BlockDefinition],
    slice: BlockSlice,
    direction: Direction,
) -> Option<usize> {
    let enumerator_id = blocks[slice.start].enumerator_id;
    match direction {
        Direction::Up => (0..slice.start)
            .rev()
            .find(|&i| blocks[i].enumerator_id == enumerator_id),
        Direction::Down => blocks
            .get(slice.end)
            .filter(|next| next.enumerator_id == enumerator_id)
            .map(|_| slice.end),
    }
}

/// Swap two adjacent slices as whole units.
///
/// Returns `None` unless one slice ends exactly where the other starts and
/// both lie within `blocks`.
pub fn swap_slices(
    blocks: &[BlockDefinition],
    first: BlockSlice,
    second: BlockSlice,
) -> Option<Vec<BlockDefinition>> {
    let (earlier, latter) = if first.starts_before(&second) {
        (first, second)
    } else {
        (second, first)
    };
    if earlier.end != latter.start || latter.end > blocks.len() {
        return None;
    }

    let mut swapped = Vec::with_capacity(blocks.len());
    swapped.extend_from_slice(&blocks[..earlier.start]);
    swapped.extend_from_slice(&blocks[latter.start..latter.end]);
    swapped.extend_from_slice(&blocks[earlier.start..earlier.end]);
    swapped.extend_from_slice(&blocks[latter.end..]);
    Some(swapped)
}

fn slice_at(tree: &BlockTree, index: usize) -> BlockSlice {
    BlockSlice::new(index, index + tree.subtree_len(index))
}
