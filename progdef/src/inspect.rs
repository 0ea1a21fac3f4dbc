//! Read-only queries for `progdef slice` and `progdef available`.

use anyhow::Result;

use crate::core::types::{BlockId, BlockSlice, PredicateKind, QuestionId};
use crate::program::ProgramDefinition;
use crate::workspace::ProgramWorkspace;

/// Slice of one block in canonical order, with the ids it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReport {
    pub block_id: BlockId,
    pub slice: BlockSlice,
    pub block_ids: Vec<BlockId>,
}

/// One question a predicate may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableQuestion {
    pub id: QuestionId,
    pub name: String,
}

pub fn slice_report(program: &ProgramDefinition, block_id: BlockId) -> Result<SliceReport> {
    let slice = program.block_slice(block_id)?;
    let ordered = program.order_block_definitions();
    let block_ids = ordered.block_definitions()[slice.start..slice.end]
        .iter()
        .map(|block| block.id)
        .collect();
    Ok(SliceReport {
        block_id,
        slice,
        block_ids,
    })
}

/// Questions a `kind` predicate on `block_id` may reference, in collection
/// order.
pub fn available_questions(
    program: &ProgramDefinition,
    block_id: BlockId,
    kind: PredicateKind,
) -> Result<Vec<AvailableQuestion>> {
    let questions = match kind {
        PredicateKind::Visibility => program.available_visibility_predicate_questions(block_id)?,
        PredicateKind::Eligibility => {
            program.available_eligibility_predicate_questions(block_id)?
        }
    };
    Ok(questions
        .into_iter()
        .map(|question| AvailableQuestion {
            id: question.id,
            name: question.name,
        })
        .collect())
}

pub fn slice_from_workspace(
    workspace: &ProgramWorkspace,
    block_id: BlockId,
) -> Result<SliceReport> {
    let (_, program) = workspace.load()?;
    slice_report(&program, block_id)
}

pub fn available_from_workspace(
    workspace: &ProgramWorkspace,
    block_id: BlockId,
    kind: PredicateKind,
) -> Result<Vec<AvailableQuestion>> {
    let (_, program) = workspace.load()?;
    available_questions(&program, block_id, kind)
}
