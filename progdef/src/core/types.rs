//! Shared deterministic types for the ordering and predicate core.
//!
//! These types describe positions and relationships inside a block list. They
//! carry no block data themselves and are recomputed on demand.

use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Identifier of a block definition. Valid ids are positive.
pub type BlockId = u64;

/// Identifier of a question definition in the question catalog.
pub type QuestionId = u64;

/// Block id meaning "no block"; resolves to no available questions.
pub const NO_BLOCK: BlockId = 0;

/// Direction for [`crate::program::ProgramDefinition::move_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// Half-open index range `[start, end)` over a canonically ordered block list.
///
/// Covers one block plus all of its repeated and nested repeated descendants.
/// Indices are only meaningful against the list the slice was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSlice {
    pub start: usize,
    pub end: usize,
}

impl BlockSlice {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "block slice must cover at least one block");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn starts_before(&self, other: &BlockSlice) -> bool {
        self.start < other.start
    }
}

impl fmt::Display for BlockSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Which predicate of a block is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    /// May reference questions from strictly earlier blocks.
    Visibility,
    /// May also reference the block's own questions.
    Eligibility,
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateKind::Visibility => f.write_str("visibility"),
            PredicateKind::Eligibility => f.write_str("eligibility"),
        }
    }
}

/// A predicate referencing questions that are not collected before it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateOrderingViolation {
    pub block_id: BlockId,
    pub kind: PredicateKind,
    /// Referenced question ids not yet collected at the predicate's position.
    pub missing_question_ids: BTreeSet<QuestionId>,
}

impl fmt::Display for PredicateOrderingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self
            .missing_question_ids
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(
            f,
            "block {}: {} predicate references questions not yet collected: {}",
            self.block_id,
            self.kind,
            ids.join(", ")
        )
    }
}
