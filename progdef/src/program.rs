//! Immutable program definitions.
//!
//! A [`ProgramDefinition`] is a value: every structural operation returns a
//! new instance and leaves the receiver untouched. Operations that depend on
//! canonical block order normalize the list once on entry and hand the
//! ordered list to the pure helpers in [`crate::core`].

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::availability::{
    available_predicate_questions, available_visibility_questions, potential_predicate_questions,
};
use crate::core::mutation::{self, MoveOutcome, MutationError};
use crate::core::ordering::{block_slice, canonical_order, is_canonical};
use crate::core::predicate_ordering::{
    has_valid_predicate_ordering, predicate_ordering_violations,
};
use crate::core::types::{
    BlockId, BlockSlice, Direction, NO_BLOCK, PredicateOrderingViolation, QuestionId,
};
use crate::error::ProgramError;
use crate::predicate::{EligibilityDefinition, PredicateDefinition};
use crate::question::{ProgramQuestionDefinition, QuestionDefinition};

/// Locale tag to localized text.
pub type LocalizedStrings = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    #[default]
    Default,
    CommonIntakeForm,
}

/// One screen of a program's application form.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub id: BlockId,
    pub name: String,
    pub description: String,
    /// Enumerator block this block repeats under; `None` for top-level blocks.
    pub enumerator_id: Option<BlockId>,
    /// True if this block collects the entities its repeated blocks iterate.
    pub is_enumerator: bool,
    pub questions: Vec<ProgramQuestionDefinition>,
    pub visibility_predicate: Option<PredicateDefinition>,
    pub eligibility_definition: Option<EligibilityDefinition>,
}

impl BlockDefinition {
    pub fn new(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            enumerator_id: None,
            is_enumerator: false,
            questions: Vec::new(),
            visibility_predicate: None,
            eligibility_definition: None,
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.enumerator_id.is_some()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question_definition(&self, index: usize) -> Option<&QuestionDefinition> {
        self.questions.get(index).map(|usage| &usage.question)
    }

    pub fn has_eligibility(&self) -> bool {
        self.eligibility_definition.is_some()
    }

    /// Ids of the questions referenced by either predicate of this block.
    pub fn predicate_question_ids(&self) -> BTreeSet<QuestionId> {
        let mut ids = BTreeSet::new();
        if let Some(predicate) = &self.visibility_predicate {
            ids.extend(predicate.questions());
        }
        if let Some(eligibility) = &self.eligibility_definition {
            ids.extend(eligibility.predicate.questions());
        }
        ids
    }
}

/// Write-once derived values of one program instance.
///
/// Excluded from equality: two programs with the same content are equal
/// whether or not their memos have been filled.
#[derive(Clone, Default)]
struct Memo {
    ordered: OnceLock<bool>,
    question_ids: OnceLock<HashSet<QuestionId>>,
}

impl PartialEq for Memo {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("ordered", &self.ordered.get())
            .finish_non_exhaustive()
    }
}

/// An immutable configuration of a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDefinition {
    id: u64,
    admin_name: String,
    admin_description: String,
    external_link: String,
    localized_name: LocalizedStrings,
    localized_description: LocalizedStrings,
    program_type: ProgramType,
    eligibility_is_gating: bool,
    block_definitions: Vec<BlockDefinition>,
    memo: Memo,
}

impl ProgramDefinition {
    pub fn builder() -> ProgramDefinitionBuilder {
        ProgramDefinitionBuilder::default()
    }

    /// Builder pre-filled with this program's content.
    pub fn to_builder(&self) -> ProgramDefinitionBuilder {
        ProgramDefinitionBuilder {
            id: self.id,
            admin_name: self.admin_name.clone(),
            admin_description: self.admin_description.clone(),
            external_link: self.external_link.clone(),
            localized_name: self.localized_name.clone(),
            localized_description: self.localized_description.clone(),
            program_type: self.program_type,
            eligibility_is_gating: self.eligibility_is_gating,
            block_definitions: self.block_definitions.clone(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn admin_name(&self) -> &str {
        &self.admin_name
    }

    pub fn admin_description(&self) -> &str {
        &self.admin_description
    }

    pub fn external_link(&self) -> &str {
        &self.external_link
    }

    pub fn localized_name(&self) -> &LocalizedStrings {
        &self.localized_name
    }

    pub fn localized_description(&self) -> &LocalizedStrings {
        &self.localized_description
    }

    pub fn program_type(&self) -> ProgramType {
        self.program_type
    }

    pub fn eligibility_is_gating(&self) -> bool {
        self.eligibility_is_gating
    }

    pub fn block_definitions(&self) -> &[BlockDefinition] {
        &self.block_definitions
    }

    // ----- ordering -----

    /// True if each enumerator block is immediately followed by all of its
    /// repeated and nested repeated blocks. Computed once per instance.
    pub fn has_ordered_block_definitions(&self) -> bool {
        *self
            .memo
            .ordered
            .get_or_init(|| is_canonical(&self.block_definitions))
    }

    /// This program with blocks in canonical order.
    ///
    /// Borrows `self` when it is already ordered.
    pub fn order_block_definitions(&self) -> Cow<'_, ProgramDefinition> {
        if self.has_ordered_block_definitions() {
            return Cow::Borrowed(self);
        }
        debug!(program_id = self.id, "normalizing block order");
        let ordered = self.with_block_definitions(canonical_order(&self.block_definitions));
        let _ = ordered.memo.ordered.set(true);
        Cow::Owned(ordered)
    }

    /// Slice of `block_id` and its repeated descendants.
    ///
    /// Indices refer to [`ProgramDefinition::order_block_definitions`], which
    /// is this program's own list when it is already ordered.
    pub fn block_slice(&self, block_id: BlockId) -> Result<BlockSlice, ProgramError> {
        let ordered = self.order_block_definitions();
        block_slice(ordered.block_definitions(), block_id)
            .ok_or_else(|| self.block_not_found(block_id))
    }

    // ----- predicates -----

    /// True if no predicate references a question collected after it, with
    /// blocks taken in canonical order.
    pub fn has_valid_predicate_ordering(&self) -> bool {
        has_valid_predicate_ordering(self.order_block_definitions().block_definitions())
    }

    /// Every predicate that references a question collected after it.
    pub fn predicate_ordering_violations(&self) -> Vec<PredicateOrderingViolation> {
        predicate_ordering_violations(self.order_block_definitions().block_definitions())
    }

    /// Questions a visibility predicate on `block_id` may reference: those
    /// available through the block right before it in canonical order.
    pub fn available_visibility_predicate_questions(
        &self,
        block_id: BlockId,
    ) -> Result<Vec<QuestionDefinition>, ProgramError> {
        let ordered = self.order_block_definitions();
        available_visibility_questions(ordered.block_definitions(), block_id)
            .ok_or_else(|| self.block_not_found(block_id))
    }

    /// Questions an eligibility predicate on `block_id` may reference: the
    /// block's own potential predicate questions.
    pub fn available_eligibility_predicate_questions(
        &self,
        block_id: BlockId,
    ) -> Result<Vec<QuestionDefinition>, ProgramError> {
        let block = self.block_definition(block_id)?;
        Ok(potential_predicate_questions(block))
    }

    /// Potential predicate questions from `block_id`, its earlier siblings and
    /// its enumerator chain, in sequential order.
    ///
    /// [`NO_BLOCK`] yields an empty list.
    pub fn available_predicate_questions(
        &self,
        block_id: BlockId,
    ) -> Result<Vec<QuestionDefinition>, ProgramError> {
        if block_id == NO_BLOCK {
            return Ok(Vec::new());
        }
        let ordered = self.order_block_definitions();
        available_predicate_questions(ordered.block_definitions(), block_id)
            .ok_or_else(|| self.block_not_found(block_id))
    }

    /// True if any block's visibility or eligibility predicate reads the question.
    pub fn is_question_used_in_predicate(&self, question_id: QuestionId) -> bool {
        self.block_definitions
            .iter()
            .any(|block| block.predicate_question_ids().contains(&question_id))
    }

    pub fn has_eligibility_enabled(&self) -> bool {
        self.block_definitions
            .iter()
            .any(BlockDefinition::has_eligibility)
    }

    // ----- structural edits -----

    /// Insert `new_block` where it keeps canonical order: at the end for a
    /// top-level block, after its enumerator's last descendant otherwise.
    ///
    /// Fails with [`ProgramError::DuplicateBlockId`] if the id is taken and
    /// with [`ProgramError::BlockNotFound`] if the enumerator is missing.
    #[instrument(skip(self, new_block), fields(program_id = self.id, block_id = new_block.id))]
    pub fn insert_block_definition_in_the_right_place(
        &self,
        new_block: BlockDefinition,
    ) -> Result<ProgramDefinition, ProgramError> {
        let ordered = self.order_block_definitions();
        let blocks = mutation::insert_block(ordered.block_definitions(), new_block)
            .map_err(|err| self.mutation_error(err))?;
        debug!(block_count = blocks.len(), "inserted block");
        Ok(self.with_block_definitions(blocks))
    }

    /// Swap `block_id` and its descendants with the adjacent sibling slice.
    ///
    /// Without a sibling in `direction` the ordered program is returned
    /// unchanged. Fails with [`ProgramError::IllegalPredicateOrdering`] if the
    /// swap would put a predicate before a question it reads.
    #[instrument(skip(self), fields(program_id = self.id))]
    pub fn move_block(
        &self,
        block_id: BlockId,
        direction: Direction,
    ) -> Result<ProgramDefinition, ProgramError> {
        let ordered = self.order_block_definitions();
        let outcome = mutation::move_block(ordered.block_definitions(), block_id, direction)
            .map_err(|err| self.mutation_error(err))?;
        let blocks = match outcome {
            MoveOutcome::AtBoundary => {
                debug!("no sibling to swap with");
                return Ok(ordered.into_owned());
            }
            MoveOutcome::Moved(blocks) => blocks,
        };
        if !has_valid_predicate_ordering(&blocks) {
            debug!("move rejected by predicate ordering");
            return Err(ProgramError::IllegalPredicateOrdering {
                block_id,
                direction,
            });
        }
        let moved = self.with_block_definitions(blocks);
        let _ = moved.memo.ordered.set(true);
        Ok(moved)
    }

    // ----- lookups -----

    pub fn block_definition(&self, block_id: BlockId) -> Result<&BlockDefinition, ProgramError> {
        self.block_definitions
            .iter()
            .find(|block| block.id == block_id)
            .ok_or_else(|| self.block_not_found(block_id))
    }

    /// Block named by a `<block id>[-<repetition>...]` path such as `3-1`.
    pub fn block_definition_by_path(&self, path: &str) -> Result<&BlockDefinition, ProgramError> {
        let block_id = path
            .split('-')
            .next()
            .and_then(|segment| segment.parse::<BlockId>().ok())
            .ok_or_else(|| ProgramError::MalformedBlockId {
                raw: path.to_string(),
            })?;
        self.block_definition(block_id)
    }

    pub fn block_definition_by_index(&self, index: usize) -> Option<&BlockDefinition> {
        self.block_definitions.get(index)
    }

    pub fn last_block_definition(&self) -> Result<&BlockDefinition, ProgramError> {
        self.block_definitions
            .last()
            .ok_or(ProgramError::ProgramNeedsABlock {
                program_id: self.id,
            })
    }

    /// Largest block id in use, or 0 for a program without blocks.
    pub fn max_block_definition_id(&self) -> BlockId {
        self.block_definitions
            .iter()
            .map(|block| block.id)
            .max()
            .unwrap_or(NO_BLOCK)
    }

    pub fn block_count(&self) -> usize {
        self.block_definitions.len()
    }

    pub fn question_count(&self) -> usize {
        self.block_definitions
            .iter()
            .map(BlockDefinition::question_count)
            .sum()
    }

    pub fn has_enumerator(&self, block_id: BlockId) -> bool {
        self.block_definitions
            .iter()
            .any(|block| block.id == block_id && block.is_enumerator)
    }

    /// Blocks repeated directly under `enumerator_id`, in list order.
    pub fn block_definitions_for_enumerator(&self, enumerator_id: BlockId) -> Vec<&BlockDefinition> {
        self.block_definitions
            .iter()
            .filter(|block| block.enumerator_id == Some(enumerator_id))
            .collect()
    }

    pub fn non_repeated_block_definitions(&self) -> Vec<&BlockDefinition> {
        self.block_definitions
            .iter()
            .filter(|block| !block.is_repeated())
            .collect()
    }

    pub fn program_question_definition(
        &self,
        question_id: QuestionId,
    ) -> Result<&ProgramQuestionDefinition, ProgramError> {
        self.block_definitions
            .iter()
            .flat_map(|block| block.questions.iter())
            .find(|usage| usage.id() == question_id)
            .ok_or(ProgramError::ProgramQuestionDefinitionNotFound {
                program_id: self.id,
                question_id,
            })
    }

    pub fn question_definition(
        &self,
        block_index: usize,
        question_index: usize,
    ) -> Option<&QuestionDefinition> {
        self.block_definitions
            .get(block_index)?
            .question_definition(question_index)
    }

    pub fn question_definitions(&self) -> impl Iterator<Item = &QuestionDefinition> {
        self.block_definitions
            .iter()
            .flat_map(|block| block.questions.iter().map(|usage| &usage.question))
    }

    /// Question ids in block order; a question used twice appears twice.
    pub fn question_ids_in_program(&self) -> Vec<QuestionId> {
        self.question_definitions().map(|question| question.id).collect()
    }

    /// True if any block uses the question. The id set is built once per instance.
    pub fn has_question(&self, question_id: QuestionId) -> bool {
        self.memo
            .question_ids
            .get_or_init(|| self.question_definitions().map(|question| question.id).collect())
            .contains(&question_id)
    }

    pub fn questions_with_primary_applicant_info_tags(&self) -> Vec<&QuestionDefinition> {
        self.question_definitions()
            .filter(|question| !question.primary_applicant_info_tags.is_empty())
            .collect()
    }

    /// Locales the program fully supports: its name and description are
    /// localized and every question supports the locale.
    pub fn supported_locales(&self) -> BTreeSet<String> {
        let mut supported: BTreeSet<String> = self
            .localized_name
            .keys()
            .filter(|locale| self.localized_description.contains_key(*locale))
            .cloned()
            .collect();
        for question in self.question_definitions() {
            supported.retain(|locale| question.supported_locales.contains(locale));
        }
        supported
    }

    /// URL-safe form of the admin name.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.admin_name.len());
        let mut pending_dash = false;
        for ch in self.admin_name.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }

    pub fn is_common_intake_form(&self) -> bool {
        self.program_type == ProgramType::CommonIntakeForm
    }

    fn with_block_definitions(&self, blocks: Vec<BlockDefinition>) -> ProgramDefinition {
        self.to_builder().block_definitions(blocks).build()
    }

    fn block_not_found(&self, block_id: BlockId) -> ProgramError {
        ProgramError::BlockNotFound {
            program_id: self.id,
            block_id,
        }
    }

    fn mutation_error(&self, err: MutationError) -> ProgramError {
        let program_id = self.id;
        match err {
            MutationError::MissingBlock(block_id) => self.block_not_found(block_id),
            MutationError::DuplicateBlock(block_id) => ProgramError::DuplicateBlockId {
                program_id,
                block_id,
            },
            MutationError::NonAdjacentSlices(block_id) => ProgramError::NonAdjacentBlocks {
                program_id,
                block_id,
            },
        }
    }
}

/// Builder for [`ProgramDefinition`].
#[derive(Debug, Clone, Default)]
pub struct ProgramDefinitionBuilder {
    id: u64,
    admin_name: String,
    admin_description: String,
    external_link: String,
    localized_name: LocalizedStrings,
    localized_description: LocalizedStrings,
    program_type: ProgramType,
    eligibility_is_gating: bool,
    block_definitions: Vec<BlockDefinition>,
}

impl ProgramDefinitionBuilder {
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn admin_name(mut self, admin_name: impl Into<String>) -> Self {
        self.admin_name = admin_name.into();
        self
    }

    pub fn admin_description(mut self, admin_description: impl Into<String>) -> Self {
        self.admin_description = admin_description.into();
        self
    }

    pub fn external_link(mut self, external_link: impl Into<String>) -> Self {
        self.external_link = external_link.into();
        self
    }

    pub fn localized_name(mut self, localized_name: LocalizedStrings) -> Self {
        self.localized_name = localized_name;
        self
    }

    pub fn add_localized_name(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.localized_name.insert(locale.into(), name.into());
        self
    }

    pub fn localized_description(mut self, localized_description: LocalizedStrings) -> Self {
        self.localized_description = localized_description;
        self
    }

    pub fn add_localized_description(
        mut self,
        locale: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.localized_description
            .insert(locale.into(), description.into());
        self
    }

    pub fn program_type(mut self, program_type: ProgramType) -> Self {
        self.program_type = program_type;
        self
    }

    pub fn eligibility_is_gating(mut self, gating: bool) -> Self {
        self.eligibility_is_gating = gating;
        self
    }

    pub fn block_definitions(mut self, blocks: Vec<BlockDefinition>) -> Self {
        self.block_definitions = blocks;
        self
    }

    pub fn add_block_definition(mut self, block: BlockDefinition) -> Self {
        self.block_definitions.push(block);
        self
    }

    pub fn build(self) -> ProgramDefinition {
        ProgramDefinition {
            id: self.id,
            admin_name: self.admin_name,
            admin_description: self.admin_description,
            external_link: self.external_link,
            localized_name: self.localized_name,
            localized_description: self.localized_description,
            program_type: self.program_type,
            eligibility_is_gating: self.eligibility_is_gating,
            block_definitions: self.block_definitions,
            memo: Memo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionType;
    use crate::test_support::{
        block, block_ids, eligible_if, enumerator, program, question, question_ids, repeated,
        repeated_enumerator, usage, visible_if, with_questions,
    };

    fn scrambled_program() -> ProgramDefinition {
        program(vec![
            enumerator(1),
            block(5),
            repeated(2, 1),
            repeated(4, 3),
            repeated_enumerator(3, 1),
        ])
    }

    #[test]
    fn order_block_definitions_nests_repeats() {
        let program = scrambled_program();
        assert!(!program.has_ordered_block_definitions());

        let ordered = program.order_block_definitions();
        assert!(matches!(ordered, Cow::Owned(_)));
        assert_eq!(block_ids(ordered.block_definitions()), vec![1, 2, 3, 4, 5]);
        assert!(ordered.has_ordered_block_definitions());
    }

    #[test]
    fn ordered_program_is_returned_as_is() {
        let program = program(vec![enumerator(1), repeated(2, 1), block(3)]);
        assert!(matches!(program.order_block_definitions(), Cow::Borrowed(_)));
    }

    #[test]
    fn ordering_twice_equals_ordering_once() {
        let once = scrambled_program().order_block_definitions().into_owned();
        let twice = once.order_block_definitions().into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn memo_does_not_affect_equality() {
        let fresh = scrambled_program();
        let queried = scrambled_program();
        assert!(!queried.has_ordered_block_definitions());
        assert!(!queried.has_question(10));
        assert_eq!(fresh, queried);
    }

    #[test]
    fn block_slice_normalizes_first() {
        let program = scrambled_program();
        assert_eq!(program.block_slice(1), Ok(BlockSlice::new(0, 4)));
        assert_eq!(program.block_slice(5), Ok(BlockSlice::new(4, 5)));
        assert_eq!(
            program.block_slice(99),
            Err(ProgramError::BlockNotFound {
                program_id: 1,
                block_id: 99
            })
        );
    }

    #[test]
    fn insert_repeated_block_on_unordered_program() {
        let program = scrambled_program();
        let inserted = program
            .insert_block_definition_in_the_right_place(repeated(6, 1))
            .expect("insert");
        assert_eq!(block_ids(inserted.block_definitions()), vec![1, 2, 3, 4, 6, 5]);
        assert_eq!(block_ids(program.block_definitions()), vec![1, 5, 2, 4, 3]);
    }

    #[test]
    fn insert_under_unknown_enumerator_is_block_not_found() {
        let err = scrambled_program()
            .insert_block_definition_in_the_right_place(repeated(6, 42))
            .expect_err("insert should fail");
        assert_eq!(
            err,
            ProgramError::BlockNotFound {
                program_id: 1,
                block_id: 42
            }
        );
    }

    #[test]
    fn insert_of_taken_id_is_rejected() {
        let program = program(vec![enumerator(1), repeated(2, 1), repeated(3, 1), block(4)]);
        assert_eq!(
            program.insert_block_definition_in_the_right_place(enumerator(1)),
            Err(ProgramError::DuplicateBlockId {
                program_id: 1,
                block_id: 1
            })
        );
        assert_eq!(
            program.insert_block_definition_in_the_right_place(repeated(3, 1)),
            Err(ProgramError::DuplicateBlockId {
                program_id: 1,
                block_id: 3
            })
        );
        assert_eq!(block_ids(program.block_definitions()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn moves_keep_every_block() {
        let mut program = program(vec![enumerator(1), repeated(2, 1), repeated(3, 1), block(4)]);
        for (id, direction) in [
            (4, Direction::Down),
            (1, Direction::Down),
            (4, Direction::Up),
            (3, Direction::Up),
        ] {
            program = program.move_block(id, direction).expect("move");
            assert_eq!(program.block_count(), 4);
        }
        assert_eq!(block_ids(program.block_definitions()), vec![4, 1, 3, 2]);
    }

    #[test]
    fn move_with_repeated_ids_is_rejected() {
        let program = program(vec![
            enumerator(1),
            repeated(2, 1),
            repeated(3, 1),
            block(4),
            enumerator(1),
        ]);
        assert_eq!(
            program.move_block(4, Direction::Down),
            Err(ProgramError::DuplicateBlockId {
                program_id: 1,
                block_id: 1
            })
        );
        assert_eq!(program.block_count(), 5);
    }

    #[test]
    fn move_at_boundary_returns_equal_program() {
        let program = program(vec![block(1), block(2)]);
        let moved = program.move_block(1, Direction::Up).expect("move");
        assert_eq!(moved, program);
    }

    #[test]
    fn move_rejected_when_predicate_would_precede_its_question() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            visible_if(block(2), &[10]),
        ]);
        let err = program
            .move_block(2, Direction::Up)
            .expect_err("move should fail");
        assert_eq!(
            err,
            ProgramError::IllegalPredicateOrdering {
                block_id: 2,
                direction: Direction::Up
            }
        );
        assert_eq!(block_ids(program.block_definitions()), vec![1, 2]);
    }

    #[test]
    fn move_accepted_when_predicates_stay_valid() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            block(2),
            visible_if(block(3), &[10]),
        ]);
        let moved = program.move_block(3, Direction::Up).expect("move");
        assert_eq!(block_ids(moved.block_definitions()), vec![1, 3, 2]);
        assert!(moved.has_ordered_block_definitions());
    }

    #[test]
    fn visibility_questions_come_from_earlier_blocks() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            with_questions(block(2), vec![usage(20, QuestionType::Number)]),
        ]);
        let questions = program
            .available_visibility_predicate_questions(2)
            .expect("available");
        assert_eq!(question_ids(&questions), vec![10]);
        assert!(program
            .available_visibility_predicate_questions(1)
            .expect("available")
            .is_empty());
        assert!(program.available_visibility_predicate_questions(9).is_err());
    }

    #[test]
    fn eligibility_questions_are_the_blocks_own() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            with_questions(
                block(2),
                vec![usage(20, QuestionType::Number), usage(21, QuestionType::FileUpload)],
            ),
        ]);
        let questions = program
            .available_eligibility_predicate_questions(2)
            .expect("available");
        assert_eq!(question_ids(&questions), vec![20]);
    }

    #[test]
    fn no_block_sentinel_has_no_questions() {
        let program = program(vec![with_questions(
            block(1),
            vec![usage(10, QuestionType::Text)],
        )]);
        assert!(program
            .available_predicate_questions(NO_BLOCK)
            .expect("available")
            .is_empty());
    }

    #[test]
    fn predicate_usage_and_eligibility_flags() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            eligible_if(
                with_questions(block(2), vec![usage(20, QuestionType::Number)]),
                &[20],
            ),
        ]);
        assert!(program.has_eligibility_enabled());
        assert!(program.is_question_used_in_predicate(20));
        assert!(!program.is_question_used_in_predicate(10));
        assert!(program.has_valid_predicate_ordering());
    }

    #[test]
    fn lookups_report_missing_items() {
        let program = program(vec![
            with_questions(block(3), vec![usage(30, QuestionType::Text)]),
            enumerator(7),
        ]);
        assert_eq!(program.block_definition_by_path("3-1").map(|b| b.id), Ok(3));
        assert_eq!(
            program.block_definition_by_path("x-1").map(|b| b.id),
            Err(ProgramError::MalformedBlockId {
                raw: "x-1".to_string()
            })
        );
        assert_eq!(program.last_block_definition().map(|b| b.id), Ok(7));
        assert_eq!(program.max_block_definition_id(), 7);
        assert!(program.has_enumerator(7));
        assert!(!program.has_enumerator(3));
        assert!(program.has_question(30));
        assert!(!program.has_question(31));
        assert_eq!(program.program_question_definition(30).map(|q| q.id()), Ok(30));
        assert!(program.program_question_definition(31).is_err());
        assert_eq!(program.question_definition(0, 0).map(|q| q.id), Some(30));
        assert_eq!(program.question_definition(1, 0), None);
    }

    #[test]
    fn empty_program_needs_a_block() {
        let program = ProgramDefinition::builder().id(4).build();
        assert_eq!(
            program.last_block_definition(),
            Err(ProgramError::ProgramNeedsABlock { program_id: 4 })
        );
        assert_eq!(program.max_block_definition_id(), 0);
    }

    #[test]
    fn supported_locales_intersect_program_and_questions() {
        let mut english_only = question(20, QuestionType::Text);
        english_only.supported_locales = BTreeSet::from(["en-US".to_string()]);
        let mut both = question(10, QuestionType::Text);
        both.supported_locales = BTreeSet::from(["en-US".to_string(), "es-US".to_string()]);

        let program = ProgramDefinition::builder()
            .id(1)
            .add_localized_name("en-US", "Food")
            .add_localized_name("es-US", "Comida")
            .add_localized_description("en-US", "Food help")
            .add_localized_description("es-US", "Ayuda")
            .add_block_definition(BlockDefinition {
                questions: vec![ProgramQuestionDefinition::new(both)],
                ..block(1)
            })
            .build();
        assert_eq!(
            program.supported_locales(),
            BTreeSet::from(["en-US".to_string(), "es-US".to_string()])
        );

        let narrowed = program
            .insert_block_definition_in_the_right_place(BlockDefinition {
                questions: vec![ProgramQuestionDefinition::new(english_only)],
                ..block(2)
            })
            .expect("insert");
        assert_eq!(
            narrowed.supported_locales(),
            BTreeSet::from(["en-US".to_string()])
        );
    }

    #[test]
    fn slug_collapses_separators() {
        let program = ProgramDefinition::builder()
            .admin_name("  Car Tab -- Rebate 2024! ")
            .build();
        assert_eq!(program.slug(), "car-tab-rebate-2024");
    }

    #[test]
    fn non_repeated_blocks_skip_repeats() {
        let program = scrambled_program();
        let ids: Vec<BlockId> = program
            .non_repeated_block_definitions()
            .iter()
            .map(|block| block.id)
            .collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn blocks_for_enumerator_keep_list_order() {
        let program = program(vec![enumerator(1), repeated(3, 1), block(4), repeated(2, 1)]);
        let ids: Vec<BlockId> = program
            .block_definitions_for_enumerator(1)
            .iter()
            .map(|block| block.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(program.block_definitions_for_enumerator(4).is_empty());
    }

    #[test]
    fn block_by_index_uses_stored_order() {
        let program = scrambled_program();
        assert_eq!(program.block_definition_by_index(1).map(|block| block.id), Some(5));
        assert_eq!(program.block_definition_by_index(4).map(|block| block.id), Some(3));
        assert!(program.block_definition_by_index(5).is_none());
    }

    #[test]
    fn question_ids_keep_repeats_across_blocks() {
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            with_questions(
                block(2),
                vec![usage(10, QuestionType::Text), usage(20, QuestionType::Number)],
            ),
        ]);
        assert_eq!(program.question_ids_in_program(), vec![10, 10, 20]);
        assert_eq!(program.question_count(), 3);
        assert_eq!(
            ProgramDefinition::builder().id(2).build().question_count(),
            0
        );
    }

    #[test]
    fn tagged_questions_are_listed() {
        let mut tagged = question(30, QuestionType::Text);
        tagged.primary_applicant_info_tags = BTreeSet::from(["APPLICANT_NAME".to_string()]);
        let program = program(vec![
            with_questions(block(1), vec![usage(10, QuestionType::Text)]),
            BlockDefinition {
                questions: vec![ProgramQuestionDefinition::new(tagged)],
                ..block(2)
            },
        ]);
        let ids: Vec<QuestionId> = program
            .questions_with_primary_applicant_info_tags()
            .iter()
            .map(|question| question.id)
            .collect();
        assert_eq!(ids, vec![30]);
    }

    #[test]
    fn common_intake_form_follows_program_type() {
        assert!(!program(vec![block(1)]).is_common_intake_form());
        let intake = ProgramDefinition::builder()
            .id(3)
            .program_type(ProgramType::CommonIntakeForm)
            .add_block_definition(block(1))
            .build();
        assert!(intake.is_common_intake_form());
        assert_eq!(intake.program_type(), ProgramType::CommonIntakeForm);
    }
}
