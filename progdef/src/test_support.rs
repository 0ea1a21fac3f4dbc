//! Test-only helpers for constructing blocks, questions and program files.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::core::types::{BlockId, QuestionId};
use crate::io::config::{ProgramToolConfig, write_config};
use crate::predicate::{
    EligibilityDefinition, LeafOperation, Operator, PredicateAction, PredicateDefinition,
    PredicateExpressionNode,
};
use crate::program::{BlockDefinition, ProgramDefinition};
use crate::question::{ProgramQuestionDefinition, QuestionDefinition, QuestionType};

/// Catalog question with deterministic name and an `en-US` locale.
pub fn question(id: QuestionId, question_type: QuestionType) -> QuestionDefinition {
    QuestionDefinition {
        id,
        name: format!("question {}", id),
        question_type,
        supported_locales: BTreeSet::from(["en-US".to_string()]),
        primary_applicant_info_tags: BTreeSet::new(),
    }
}

/// Program usage of a fresh catalog question.
pub fn usage(id: QuestionId, question_type: QuestionType) -> ProgramQuestionDefinition {
    ProgramQuestionDefinition::new(question(id, question_type))
}

pub fn address_usage(id: QuestionId, correction_enabled: bool) -> ProgramQuestionDefinition {
    ProgramQuestionDefinition {
        address_correction_enabled: correction_enabled,
        ..usage(id, QuestionType::Address)
    }
}

/// Top-level, non-enumerator block without questions.
pub fn block(id: BlockId) -> BlockDefinition {
    BlockDefinition::new(id, format!("block {}", id))
}

pub fn enumerator(id: BlockId) -> BlockDefinition {
    BlockDefinition {
        is_enumerator: true,
        ..block(id)
    }
}

pub fn repeated(id: BlockId, enumerator_id: BlockId) -> BlockDefinition {
    BlockDefinition {
        enumerator_id: Some(enumerator_id),
        ..block(id)
    }
}

pub fn repeated_enumerator(id: BlockId, enumerator_id: BlockId) -> BlockDefinition {
    BlockDefinition {
        is_enumerator: true,
        ..repeated(id, enumerator_id)
    }
}

pub fn with_questions(
    block: BlockDefinition,
    questions: Vec<ProgramQuestionDefinition>,
) -> BlockDefinition {
    BlockDefinition { questions, ..block }
}

/// Predicate that ANDs a leaf comparison for each question id.
pub fn predicate_on(question_ids: &[QuestionId], action: PredicateAction) -> PredicateDefinition {
    let children = question_ids
        .iter()
        .map(|&question_id| {
            PredicateExpressionNode::Leaf(LeafOperation {
                question_id,
                scalar: "text".to_string(),
                operator: Operator::Equal,
                value: json!("yes"),
            })
        })
        .collect();
    PredicateDefinition {
        root: PredicateExpressionNode::And { children },
        action,
    }
}

pub fn visible_if(block: BlockDefinition, question_ids: &[QuestionId]) -> BlockDefinition {
    BlockDefinition {
        visibility_predicate: Some(predicate_on(question_ids, PredicateAction::ShowBlock)),
        ..block
    }
}

pub fn eligible_if(block: BlockDefinition, question_ids: &[QuestionId]) -> BlockDefinition {
    BlockDefinition {
        eligibility_definition: Some(EligibilityDefinition {
            predicate: predicate_on(question_ids, PredicateAction::EligibleBlock),
        }),
        ..block
    }
}

/// Program with id 1 and the given blocks in the given order.
pub fn program(blocks: Vec<BlockDefinition>) -> ProgramDefinition {
    ProgramDefinition::builder()
        .id(1)
        .admin_name("test-program")
        .block_definitions(blocks)
        .build()
}

pub fn block_ids(blocks: &[BlockDefinition]) -> Vec<BlockId> {
    blocks.iter().map(|block| block.id).collect()
}

pub fn question_ids(questions: &[QuestionDefinition]) -> Vec<QuestionId> {
    questions.iter().map(|question| question.id).collect()
}

pub fn catalog(questions: Vec<QuestionDefinition>) -> HashMap<QuestionId, QuestionDefinition> {
    questions
        .into_iter()
        .map(|question| (question.id, question))
        .collect()
}

/// Temporary directory holding a config, a program file and a catalog.
///
/// The default fixture is a household program:
/// ```text
/// 1 applicant        (top-level, q10 text, q11 address w/o correction)
/// 2 household        (enumerator, q20 enumerator)
/// 3   member info    (repeated under 2, q30 date)
/// 4   jobs           (enumerator under 2, q40 enumerator)
/// 5     job income   (repeated under 4, q50 currency, eligibility on q50)
/// 6 income           (top-level, q60 number, visible if q10)
/// 7 review           (top-level, visible if q60)
/// ```
pub struct TestWorkspace {
    dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let workspace = Self { dir };
        write_config(&workspace.config_path(), &ProgramToolConfig::default())?;
        workspace.write_raw("questions.json", &fixture_catalog_json())?;
        workspace.write_raw("program.json", &fixture_program_json())?;
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("progdef.toml")
    }

    pub fn program_path(&self) -> PathBuf {
        self.path().join("program.json")
    }

    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read_program_json(&self) -> Result<serde_json::Value> {
        let raw = fs::read_to_string(self.program_path()).context("read program.json")?;
        serde_json::from_str(&raw).context("parse program.json")
    }
}

/// Block ids of a stored program JSON value, in file order.
pub fn stored_block_ids(program: &serde_json::Value) -> Vec<u64> {
    program["blockDefinitions"]
        .as_array()
        .map(|blocks| blocks.iter().filter_map(|b| b["id"].as_u64()).collect())
        .expect("blockDefinitions array")
}

pub fn fixture_catalog_json() -> String {
    let questions = vec![
        question(10, QuestionType::Text),
        question(11, QuestionType::Address),
        question(20, QuestionType::Enumerator),
        question(30, QuestionType::Date),
        question(40, QuestionType::Enumerator),
        question(50, QuestionType::Currency),
        question(60, QuestionType::Number),
    ];
    serde_json::to_string_pretty(&questions).expect("serialize fixture catalog")
}

fn stored_leaf(question_id: QuestionId) -> serde_json::Value {
    json!({
        "node": "leaf",
        "questionId": question_id,
        "scalar": "text",
        "operator": "equal",
        "value": "yes"
    })
}

pub fn fixture_program_json() -> String {
    let program = json!({
        "id": 1,
        "adminName": "household-benefits",
        "adminDescription": "fixture",
        "localizedName": {"en-US": "Household benefits"},
        "localizedDescription": {"en-US": "Benefits for households"},
        "blockDefinitions": [
            {"id": 1, "name": "applicant", "questions": [{"id": 10}, {"id": 11}]},
            {"id": 2, "name": "household", "isEnumerator": true, "questions": [{"id": 20}]},
            {"id": 3, "name": "member info", "enumeratorId": 2, "questions": [{"id": 30}]},
            {"id": 4, "name": "jobs", "enumeratorId": 2, "isEnumerator": true, "questions": [{"id": 40}]},
            {
                "id": 5,
                "name": "job income",
                "enumeratorId": 4,
                "questions": [{"id": 50}],
                "eligibilityDefinition": {
                    "predicate": {"root": stored_leaf(50), "action": "eligible_block"}
                }
            },
            {
                "id": 6,
                "name": "income",
                "questions": [{"id": 60}],
                "visibilityPredicate": {"root": stored_leaf(10), "action": "show_block"}
            },
            {
                "id": 7,
                "name": "review",
                "visibilityPredicate": {"root": stored_leaf(60), "action": "show_block"}
            }
        ]
    });
    serde_json::to_string_pretty(&program).expect("serialize fixture program")
}
