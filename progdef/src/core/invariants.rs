//! Structural invariants of a program's block list.

use std::collections::HashSet;

use crate::core::block_tree::BlockTree;
use crate::core::types::{BlockId, NO_BLOCK};
use crate::program::ProgramDefinition;

/// Check invariants every persisted program must satisfy:
/// - At least one block
/// - Block ids are positive and unique
/// - `enumerator_id` names an existing enumerator block other than itself
/// - Every block is reachable from a top-level block (no enumerator cycles)
/// - Predicates only reference questions used somewhere in the program
///
/// Returns a list of stable error messages in block order.
pub fn validate_invariants(program: &ProgramDefinition) -> Vec<String> {
    let blocks = program.block_definitions();
    let mut errors = Vec::new();

    if blocks.is_empty() {
        errors.push(format!("program {}: must have at least one block", program.id()));
        return errors;
    }

    let mut seen: HashSet<BlockId> = HashSet::new();
    for block in blocks {
        if block.id == NO_BLOCK {
            errors.push("block id must be > 0".to_string());
        }
        if !seen.insert(block.id) {
            errors.push(format!("duplicate block id {}", block.id));
        }
    }

    for block in blocks {
        let Some(enumerator_id) = block.enumerator_id else {
            continue;
        };
        if enumerator_id == block.id {
            errors.push(format!("block {}: repeats under itself", block.id));
        } else if !program.has_enumerator(enumerator_id) {
            errors.push(format!(
                "block {}: enumerator {} is not an enumerator block in this program",
                block.id, enumerator_id
            ));
        }
    }

    if errors.is_empty() {
        let tree = BlockTree::build(blocks);
        for index in tree.unreachable() {
            errors.push(format!(
                "block {}: not reachable from a top-level block (enumerator cycle)",
                blocks[index].id
            ));
        }
    }

    for block in blocks {
        for question_id in block.predicate_question_ids() {
            if !program.has_question(question_id) {
                errors.push(format!(
                    "block {}: predicate references question {} not used in the program",
                    block.id, question_id
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionType;
    use crate::test_support::{
        block, enumerator, program, repeated, repeated_enumerator, usage, visible_if,
        with_questions,
    };

    #[test]
    fn valid_program_has_no_errors() {
        let program = program(vec![
            with_questions(enumerator(1), vec![usage(10, QuestionType::Enumerator)]),
            repeated(2, 1),
            with_questions(block(3), vec![usage(30, QuestionType::Text)]),
            visible_if(block(4), &[30]),
        ]);
        assert!(validate_invariants(&program).is_empty());
    }

    #[test]
    fn reports_structural_errors() {
        let program = program(vec![
            block(1),
            block(1),
            repeated(2, 1),
            repeated(3, 9),
            repeated_enumerator(4, 4),
        ]);
        let errors = validate_invariants(&program);
        assert!(errors.iter().any(|err| err.contains("duplicate block id 1")));
        assert!(errors.iter().any(|err| err.contains("block 2: enumerator 1")));
        assert!(errors.iter().any(|err| err.contains("block 3: enumerator 9")));
        assert!(errors.iter().any(|err| err.contains("block 4: repeats under itself")));
    }

    #[test]
    fn reports_enumerator_cycles() {
        let program = program(vec![
            block(1),
            repeated_enumerator(2, 3),
            repeated_enumerator(3, 2),
        ]);
        let errors = validate_invariants(&program);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|err| err.contains("not reachable")));
    }

    #[test]
    fn reports_empty_program_and_unknown_predicate_questions() {
        let empty = ProgramDefinition::builder().id(8).build();
        assert_eq!(
            validate_invariants(&empty),
            vec!["program 8: must have at least one block".to_string()]
        );

        let program = program(vec![block(1), visible_if(block(2), &[77])]);
        assert_eq!(
            validate_invariants(&program),
            vec!["block 2: predicate references question 77 not used in the program".to_string()]
        );
    }
}
