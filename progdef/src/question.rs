//! Question definitions as supplied by the question catalog.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::types::QuestionId;

/// Type tag of a catalog question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Address,
    Checkbox,
    Currency,
    Date,
    Dropdown,
    Email,
    Enumerator,
    FileUpload,
    Id,
    Name,
    Number,
    Phone,
    RadioButton,
    Static,
    Text,
    YesNo,
}

/// A question as defined in the catalog, independent of any program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub name: String,
    pub question_type: QuestionType,
    /// Locale tags (e.g. `en-US`) this question is fully translated into.
    #[serde(default)]
    pub supported_locales: BTreeSet<String>,
    #[serde(default)]
    pub primary_applicant_info_tags: BTreeSet<String>,
}

/// A question as used inside one block of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramQuestionDefinition {
    pub question: QuestionDefinition,
    pub optional: bool,
    /// Only meaningful for address questions.
    pub address_correction_enabled: bool,
}

impl ProgramQuestionDefinition {
    pub fn new(question: QuestionDefinition) -> Self {
        Self {
            question,
            optional: false,
            address_correction_enabled: false,
        }
    }

    pub fn id(&self) -> QuestionId {
        self.question.id
    }

    pub fn question_type(&self) -> QuestionType {
        self.question.question_type
    }
}

/// Read-only lookup of question definitions by id.
pub trait QuestionCatalog {
    fn question(&self, id: QuestionId) -> Option<&QuestionDefinition>;
}

impl QuestionCatalog for HashMap<QuestionId, QuestionDefinition> {
    fn question(&self, id: QuestionId) -> Option<&QuestionDefinition> {
        self.get(&id)
    }
}
