//! Orchestration for `progdef order`, `progdef insert` and `progdef move`.
//!
//! Each edit loads the configured program, applies one pure transformation
//! and writes the result back. Structural errors surface as
//! [`ProgramError`](crate::error::ProgramError) inside the `anyhow` chain so
//! the CLI can map them to exit codes.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::core::invariants::validate_invariants;
use crate::core::types::{BlockId, Direction};
use crate::io::program_store::{load_block, write_program};
use crate::program::ProgramDefinition;
use crate::workspace::ProgramWorkspace;

/// Result of one edit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub program_id: u64,
    /// Block ids in the order they were written.
    pub block_ids: Vec<BlockId>,
    /// False when the stored block order did not change.
    pub changed: bool,
}

impl EditOutcome {
    fn new(before: &ProgramDefinition, after: &ProgramDefinition) -> Self {
        let written = block_ids(after);
        Self {
            program_id: after.id(),
            changed: written != block_ids(before),
            block_ids: written,
        }
    }
}

/// Rewrite the program in canonical order regardless of `normalize_on_write`.
pub fn order_program(workspace: &ProgramWorkspace) -> Result<EditOutcome> {
    let (_, program) = workspace.load()?;
    let ordered = program.order_block_definitions();
    write_program(&workspace.files.program_path, &ordered, true)?;
    let outcome = EditOutcome::new(&program, &ordered);
    info!(changed = outcome.changed, "ordered program");
    Ok(outcome)
}

/// Insert the block stored at `block_path` at its canonical position.
pub fn insert_block(workspace: &ProgramWorkspace, block_path: &Path) -> Result<EditOutcome> {
    let (catalog, program) = workspace.load()?;
    let block = load_block(block_path, &catalog)?;
    let block_id = block.id;
    let inserted = program.insert_block_definition_in_the_right_place(block)?;
    let errors = validate_invariants(&inserted);
    if !errors.is_empty() {
        bail!(
            "inserting block {} breaks program invariants: {}",
            block_id,
            errors.join("; ")
        );
    }
    workspace
        .save(&inserted)
        .with_context(|| format!("save program after inserting block {}", block_id))?;
    info!(block_id, "inserted block");
    Ok(EditOutcome::new(&program, &inserted))
}

/// Move `block_id` one sibling slot in `direction`.
pub fn move_block(
    workspace: &ProgramWorkspace,
    block_id: BlockId,
    direction: Direction,
) -> Result<EditOutcome> {
    let (_, program) = workspace.load()?;
    let moved = program.move_block(block_id, direction)?;
    workspace
        .save(&moved)
        .with_context(|| format!("save program after moving block {}", block_id))?;
    let outcome = EditOutcome::new(&program, &moved);
    info!(block_id, %direction, changed = outcome.changed, "moved block");
    Ok(outcome)
}

fn block_ids(program: &ProgramDefinition) -> Vec<BlockId> {
    program
        .block_definitions()
        .iter()
        .map(|block| block.id)
        .collect()
}
