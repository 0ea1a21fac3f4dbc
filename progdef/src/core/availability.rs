//! Questions a block's predicates are allowed to reference.
//!
//! A predicate may only read answers the applicant has already given by the
//! time the block is shown. For a repeated block that means questions from
//! its enumerator chain and from earlier siblings at each level, never from
//! sibling subtrees that repeat independently.

use crate::core::block_tree::BlockTree;
use crate::core::types::BlockId;
use crate::program::BlockDefinition;
use crate::question::{ProgramQuestionDefinition, QuestionDefinition, QuestionType};

/// True if a question of this usage can appear in a predicate.
///
/// Enumerator, file upload, static text and phone questions never can.
/// Address questions can only when address correction is enabled.
pub fn is_potential_predicate_question(usage: &ProgramQuestionDefinition) -> bool {
    match usage.question_type() {
        QuestionType::Enumerator
        | QuestionType::FileUpload
        | QuestionType::Static
        | QuestionType::Phone => false,
        QuestionType::Address => usage.address_correction_enabled,
        _ => true,
    }
}

/// Indices of the blocks whose questions are visible from `index`, in
/// sequential order.
///
/// For each level of the enumerator chain, outermost first, takes the
/// siblings at that level up to and including the chain member.
pub fn available_predicate_blocks(tree: &BlockTree, index: usize) -> Vec<usize> {
    let mut available = Vec::new();
    for member in tree.ancestors_and_self(index) {
        for &sibling in tree.siblings(member) {
            available.push(sibling);
            if sibling == member {
                break;
            }
        }
    }
    available
}

/// Potential predicate questions from `block_id`, its earlier siblings, and
/// its enumerator chain.
///
/// `blocks` must be in canonical order. Returns `None` if no block has the id.
pub fn available_predicate_questions(
    blocks: &[BlockDefinition],
    block_id: BlockId,
) -> Option<Vec<QuestionDefinition>> {
    let tree = BlockTree::build(blocks);
    let index = tree.index_of(block_id)?;
    let questions = available_predicate_blocks(&tree, index)
        .into_iter()
        .flat_map(|i| potential_predicate_questions(&blocks[i]))
        .collect();
    Some(questions)
}

/// Questions available to the visibility predicate of `block_id`: those
/// available through the block immediately before it.
///
/// `blocks` must be in canonical order. Returns `None` if no block has the id;
/// the first block gets an empty list.
pub fn available_visibility_questions(
    blocks: &[BlockDefinition],
    block_id: BlockId,
) -> Option<Vec<QuestionDefinition>> {
    let position = blocks.iter().position(|block| block.id == block_id)?;
    match position.checked_sub(1) {
        Some(previous) => available_predicate_questions(blocks, blocks[previous].id),
        None => Some(Vec::new()),
    }
}

/// Potential predicate questions within a single block.
pub fn potential_predicate_questions(block: &BlockDefinition) -> Vec<QuestionDefinition> {
    block
        .questions
        .iter()
        .filter(|usage| is_potential_predicate_question(usage))
        .map(|usage| usage.question.clone())
        .collect()
}
