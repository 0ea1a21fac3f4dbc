//! Validation helpers for `progdef validate`.

use anyhow::{Result, bail};
use tracing::warn;

use crate::core::types::PredicateOrderingViolation;
use crate::program::ProgramDefinition;
use crate::workspace::ProgramWorkspace;

/// High-level validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub program_id: u64,
    pub block_count: usize,
    /// Blocks are stored in canonical order.
    pub ordered: bool,
    pub violations: Vec<PredicateOrderingViolation>,
}

impl ValidateOutcome {
    pub fn is_clean(&self) -> bool {
        self.ordered && self.violations.is_empty()
    }
}

/// Inspect an already loaded program.
pub fn validate_program(program: &ProgramDefinition) -> ValidateOutcome {
    ValidateOutcome {
        program_id: program.id(),
        block_count: program.block_count(),
        ordered: program.has_ordered_block_definitions(),
        violations: program.predicate_ordering_violations(),
    }
}

/// Load the configured program (schema + catalog + invariants) and report
/// ordering status.
///
/// With `strict_predicate_ordering`, any violation is an error.
pub fn validate_workspace(workspace: &ProgramWorkspace) -> Result<ValidateOutcome> {
    let (_, program) = workspace.load()?;
    let outcome = validate_program(&program);
    for violation in &outcome.violations {
        warn!(%violation, "predicate ordering violation");
    }
    if workspace.config.strict_predicate_ordering && !outcome.violations.is_empty() {
        let messages = outcome
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        bail!("predicate ordering violations: {}", messages.join("; "));
    }
    Ok(outcome)
}
