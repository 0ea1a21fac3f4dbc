//! Structural errors raised by program-definition operations.

use crate::core::types::{BlockId, Direction, QuestionId};

/// Errors produced by lookups and structural edits on a program definition.
///
/// Every variant is recoverable by the caller: the program value the operation
/// was invoked on is never modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    /// The referenced block id does not exist in the program.
    #[error("block definition {block_id} not found in program {program_id}")]
    BlockNotFound { program_id: u64, block_id: BlockId },

    /// Another block in the program already uses the id.
    #[error("block definition {block_id} already exists in program {program_id}")]
    DuplicateBlockId { program_id: u64, block_id: BlockId },

    /// The block and the sibling it would swap with are not laid out next to
    /// each other.
    #[error(
        "block definition {block_id} in program {program_id} is not adjacent to the sibling it would swap with"
    )]
    NonAdjacentBlocks { program_id: u64, block_id: BlockId },

    /// A move would place a block condition before a question it depends on.
    #[error(
        "moving block {block_id} {direction} is not possible: it would move a block condition before the question it depends on"
    )]
    IllegalPredicateOrdering {
        block_id: BlockId,
        direction: Direction,
    },

    /// The program has no blocks where at least one is required.
    #[error("program {program_id} needs at least one block")]
    ProgramNeedsABlock { program_id: u64 },

    /// The program does not use the referenced question.
    #[error("question {question_id} not found in program {program_id}")]
    ProgramQuestionDefinitionNotFound {
        program_id: u64,
        question_id: QuestionId,
    },

    /// A `<block id>-<repetition>` path whose leading segment is not a block id.
    #[error("malformed block id '{raw}'")]
    MalformedBlockId { raw: String },
}
