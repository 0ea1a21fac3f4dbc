//! Checks that predicates only reference questions collected before them.

use std::collections::{BTreeSet, HashSet};

use crate::core::types::{PredicateKind, PredicateOrderingViolation, QuestionId};
use crate::predicate::PredicateDefinition;
use crate::program::BlockDefinition;

/// Every predicate whose questions are not collected by its position.
///
/// Visibility predicates must reference questions from strictly earlier
/// blocks. Eligibility predicates may also reference the block's own
/// questions. Results follow block order.
pub fn predicate_ordering_violations(
    blocks: &[BlockDefinition],
) -> Vec<PredicateOrderingViolation> {
    let mut seen: HashSet<QuestionId> = HashSet::new();
    let mut violations = Vec::new();

    for block in blocks {
        if let Some(predicate) = &block.visibility_predicate {
            check(block, PredicateKind::Visibility, predicate, &seen, &mut violations);
        }
        seen.extend(block.questions.iter().map(|usage| usage.id()));
        if let Some(eligibility) = &block.eligibility_definition {
            check(
                block,
                PredicateKind::Eligibility,
                &eligibility.predicate,
                &seen,
                &mut violations,
            );
        }
    }

    violations
}

/// True if no predicate references a question collected after it.
pub fn has_valid_predicate_ordering(blocks: &[BlockDefinition]) -> bool {
    predicate_ordering_violations(blocks).is_empty()
}

fn check(
    block: &BlockDefinition,
    kind: PredicateKind,
    predicate: &PredicateDefinition,
    seen: &HashSet<QuestionId>,
    violations: &mut Vec<PredicateOrderingViolation>,
) {
    let missing: BTreeSet<QuestionId> = predicate
        .questions()
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        violations.push(PredicateOrderingViolation {
            block_id: block.id,
            kind,
            missing_question_ids: missing,
        });
    }
}
