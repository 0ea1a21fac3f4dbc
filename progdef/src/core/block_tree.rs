//! Explicit enumerator tree over a flat block list.
//!
//! Blocks only point at their enumerator through `enumerator_id`. This module
//! turns those back-references into an arena of nodes with parent and ordered
//! child links so that subtree and ancestor queries are direct walks instead
//! of repeated scans of the list.

use std::collections::HashMap;

use crate::core::types::BlockId;
use crate::program::BlockDefinition;

#[derive(Debug, Clone, Default)]
struct TreeNode {
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Enumerator tree indexed by position in the list it was built from.
///
/// Node `i` is the block at index `i` of the source list. Children keep the
/// relative order they have in the source list.
#[derive(Debug, Clone)]
pub struct BlockTree {
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
    by_id: HashMap<BlockId, usize>,
}

impl BlockTree {
    /// Build the tree for `blocks`.
    ///
    /// A block becomes a child of the block named by its `enumerator_id` only
    /// if that block exists and is an enumerator. If ids repeat, the first
    /// occurrence wins.
    pub fn build(blocks: &[BlockDefinition]) -> Self {
        let mut by_id = HashMap::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            by_id.entry(block.id).or_insert(index);
        }

        let mut nodes = vec![TreeNode::default(); blocks.len()];
        let mut roots = Vec::new();
        for (index, block) in blocks.iter().enumerate() {
            let Some(enumerator_id) = block.enumerator_id else {
                roots.push(index);
                continue;
            };
            let Some(&parent) = by_id.get(&enumerator_id) else {
                continue;
            };
            if parent == index || !blocks[parent].is_enumerator {
                continue;
            }
            nodes[index].parent = Some(parent);
            nodes[parent].children.push(index);
        }

        Self {
            nodes,
            roots,
            by_id,
        }
    }

    pub fn index_of(&self, block_id: BlockId) -> Option<usize> {
        self.by_id.get(&block_id).copied()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Blocks sharing the parent of `index`, or all top-level blocks.
    pub fn siblings(&self, index: usize) -> &[usize] {
        match self.nodes[index].parent {
            Some(parent) => &self.nodes[parent].children,
            None => &self.roots,
        }
    }

    /// Depth-first pre-order from the roots: each block followed by its
    /// repeated descendants.
    ///
    /// Blocks that cannot be reached from a top-level block (missing or
    /// non-enumerator parent, or an enumerator cycle) are not emitted.
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        order
    }

    /// Source indices not emitted by [`BlockTree::preorder`].
    pub fn unreachable(&self) -> Vec<usize> {
        let mut reached = vec![false; self.nodes.len()];
        for index in self.preorder() {
            reached[index] = true;
        }
        (0..self.nodes.len()).filter(|&i| !reached[i]).collect()
    }

    /// Number of blocks in the subtree rooted at `index`, itself included.
    ///
    /// `index` must be reachable from a top-level block.
    pub fn subtree_len(&self, index: usize) -> usize {
        let mut count = 0;
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[current].children.iter());
        }
        count
    }

    /// Enumerator chain of `index`, outermost first, ending with `index`.
    pub fn ancestors_and_self(&self, index: usize) -> Vec<usize> {
        let mut chain = vec![index];
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            if chain.len() > self.nodes.len() {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}
