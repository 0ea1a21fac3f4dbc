//! Program load/save helpers with schema, catalog and invariant validation.
//!
//! On disk a block lists its questions by id only; loading resolves every id
//! through a [`QuestionCatalog`] so the in-memory program carries full
//! question definitions.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::invariants::validate_invariants;
use crate::core::types::{BlockId, QuestionId};
use crate::predicate::{EligibilityDefinition, PredicateDefinition};
use crate::program::{BlockDefinition, LocalizedStrings, ProgramDefinition, ProgramType};
use crate::question::{ProgramQuestionDefinition, QuestionCatalog};

pub const PROGRAM_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/program.v1.schema.json"
));

/// Persisted form of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProgram {
    pub id: u64,
    pub admin_name: String,
    #[serde(default)]
    pub admin_description: String,
    #[serde(default)]
    pub external_link: String,
    #[serde(default)]
    pub localized_name: LocalizedStrings,
    #[serde(default)]
    pub localized_description: LocalizedStrings,
    #[serde(default)]
    pub program_type: ProgramType,
    #[serde(default)]
    pub eligibility_is_gating: bool,
    pub block_definitions: Vec<StoredBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlock {
    pub id: BlockId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerator_id: Option<BlockId>,
    #[serde(default)]
    pub is_enumerator: bool,
    #[serde(default)]
    pub questions: Vec<StoredQuestionUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_predicate: Option<PredicateDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility_definition: Option<EligibilityDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuestionUsage {
    pub id: QuestionId,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub address_correction_enabled: bool,
}

impl StoredBlock {
    /// Resolve question ids through `catalog`.
    pub fn hydrate(&self, catalog: &impl QuestionCatalog) -> Result<BlockDefinition> {
        let questions = self
            .questions
            .iter()
            .map(|stored| {
                let question = catalog.question(stored.id).ok_or_else(|| {
                    anyhow!("block {}: question {} not found in catalog", self.id, stored.id)
                })?;
                Ok(ProgramQuestionDefinition {
                    question: question.clone(),
                    optional: stored.optional,
                    address_correction_enabled: stored.address_correction_enabled,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BlockDefinition {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            enumerator_id: self.enumerator_id,
            is_enumerator: self.is_enumerator,
            questions,
            visibility_predicate: self.visibility_predicate.clone(),
            eligibility_definition: self.eligibility_definition.clone(),
        })
    }
}

impl From<&BlockDefinition> for StoredBlock {
    fn from(block: &BlockDefinition) -> Self {
        Self {
            id: block.id,
            name: block.name.clone(),
            description: block.description.clone(),
            enumerator_id: block.enumerator_id,
            is_enumerator: block.is_enumerator,
            questions: block
                .questions
                .iter()
                .map(|usage| StoredQuestionUsage {
                    id: usage.id(),
                    optional: usage.optional,
                    address_correction_enabled: usage.address_correction_enabled,
                })
                .collect(),
            visibility_predicate: block.visibility_predicate.clone(),
            eligibility_definition: block.eligibility_definition.clone(),
        }
    }
}

impl StoredProgram {
    pub fn hydrate(&self, catalog: &impl QuestionCatalog) -> Result<ProgramDefinition> {
        let blocks = self
            .block_definitions
            .iter()
            .map(|block| block.hydrate(catalog))
            .collect::<Result<Vec<_>>>()?;
        Ok(ProgramDefinition::builder()
            .id(self.id)
            .admin_name(self.admin_name.clone())
            .admin_description(self.admin_description.clone())
            .external_link(self.external_link.clone())
            .localized_name(self.localized_name.clone())
            .localized_description(self.localized_description.clone())
            .program_type(self.program_type)
            .eligibility_is_gating(self.eligibility_is_gating)
            .block_definitions(blocks)
            .build())
    }
}

impl From<&ProgramDefinition> for StoredProgram {
    fn from(program: &ProgramDefinition) -> Self {
        Self {
            id: program.id(),
            admin_name: program.admin_name().to_string(),
            admin_description: program.admin_description().to_string(),
            external_link: program.external_link().to_string(),
            localized_name: program.localized_name().clone(),
            localized_description: program.localized_description().clone(),
            program_type: program.program_type(),
            eligibility_is_gating: program.eligibility_is_gating(),
            block_definitions: program
                .block_definitions()
                .iter()
                .map(StoredBlock::from)
                .collect(),
        }
    }
}

/// Parse and validate a program: schema conformance, catalog hydration and
/// structural invariants.
pub fn parse_program(raw: &str, catalog: &impl QuestionCatalog) -> Result<ProgramDefinition> {
    let value: Value = serde_json::from_str(raw).context("parse program json")?;
    validate_schema(&value)?;
    let stored: StoredProgram =
        serde_json::from_value(value).context("deserialize program json")?;
    let program = stored.hydrate(catalog)?;
    let errors = validate_invariants(&program);
    if !errors.is_empty() {
        return Err(anyhow!("program invariants failed: {}", errors.join("; ")));
    }
    Ok(program)
}

/// Load and validate the program at `path`.
#[instrument(skip(catalog), fields(path = %path.display()))]
pub fn load_program(path: &Path, catalog: &impl QuestionCatalog) -> Result<ProgramDefinition> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read program {}", path.display()))?;
    let program =
        parse_program(&raw, catalog).with_context(|| format!("load program {}", path.display()))?;
    debug!(
        program_id = program.id(),
        blocks = program.block_count(),
        "loaded program"
    );
    Ok(program)
}

/// Load a single block (persisted form) and hydrate it.
pub fn load_block(path: &Path, catalog: &impl QuestionCatalog) -> Result<BlockDefinition> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read block {}", path.display()))?;
    let stored: StoredBlock =
        serde_json::from_str(&raw).with_context(|| format!("parse block {}", path.display()))?;
    stored
        .hydrate(catalog)
        .with_context(|| format!("hydrate block {}", path.display()))
}

/// Write `program` as pretty JSON, optionally in canonical block order.
pub fn write_program(path: &Path, program: &ProgramDefinition, normalize: bool) -> Result<()> {
    let stored = if normalize {
        StoredProgram::from(program.order_block_definitions().as_ref())
    } else {
        StoredProgram::from(program)
    };
    let mut buf = serde_json::to_string_pretty(&stored).context("serialize program json")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write program {}", path.display()))
}

fn validate_schema(program: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(PROGRAM_SCHEMA).context("parse program schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(program) {
        let messages = compiled
            .iter_errors(program)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "program schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionType;
    use crate::test_support::{
        block_ids, catalog, fixture_catalog_json, fixture_program_json, question,
    };

    fn fixture_catalog() -> crate::io::catalog::JsonQuestionCatalog {
        let questions = serde_json::from_str(&fixture_catalog_json()).expect("catalog json");
        crate::io::catalog::JsonQuestionCatalog::from_questions(questions).expect("catalog")
    }

    #[test]
    fn parses_and_hydrates_fixture() {
        let program = parse_program(&fixture_program_json(), &fixture_catalog()).expect("parse");
        assert_eq!(program.id(), 1);
        assert_eq!(block_ids(program.block_definitions()), vec![1, 2, 3, 4, 5, 6, 7]);
        let applicant = program.block_definition(1).expect("block 1");
        assert_eq!(
            applicant.questions[1].question_type(),
            QuestionType::Address
        );
        assert!(program.has_ordered_block_definitions());
        assert!(program.has_valid_predicate_ordering());
    }

    #[test]
    fn missing_catalog_question_fails() {
        let catalog = catalog(vec![question(10, QuestionType::Text)]);
        let err = parse_program(&fixture_program_json(), &catalog).expect_err("should fail");
        assert!(err.to_string().contains("not found in catalog"));
    }

    #[test]
    fn schema_rejects_missing_blocks_key() {
        let err = parse_program(r#"{"id": 1, "adminName": "x"}"#, &fixture_catalog())
            .expect_err("should fail");
        assert!(err.to_string().contains("schema validation failed"));
    }

    #[test]
    fn invariant_violations_fail_load() {
        let raw = r#"{
            "id": 3,
            "adminName": "broken",
            "blockDefinitions": [
                {"id": 1, "name": "a"},
                {"id": 2, "name": "b", "enumeratorId": 1}
            ]
        }"#;
        let err = parse_program(raw, &fixture_catalog()).expect_err("should fail");
        assert!(err.to_string().contains("program invariants failed"));
    }

    #[test]
    fn write_then_load_round_trip_normalizes_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("program.json");
        let catalog = fixture_catalog();
        let program = parse_program(&fixture_program_json(), &catalog).expect("parse");
        let scrambled = program
            .to_builder()
            .block_definitions(
                [6, 3, 1, 5, 2, 7, 4]
                    .iter()
                    .map(|&id| program.block_definition(id).expect("block").clone())
                    .collect(),
            )
            .build();

        write_program(&path, &scrambled, true).expect("write");
        let loaded = load_program(&path, &catalog).expect("load");
        assert_eq!(block_ids(loaded.block_definitions()), vec![6, 1, 2, 3, 4, 5, 7]);

        write_program(&path, &scrambled, false).expect("write");
        let loaded = load_program(&path, &catalog).expect("load");
        assert_eq!(loaded, scrambled);
    }
}
