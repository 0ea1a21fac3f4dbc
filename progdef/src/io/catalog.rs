//! Question catalog backed by a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::types::QuestionId;
use crate::question::{QuestionCatalog, QuestionDefinition};

/// Read-only catalog loaded from a JSON array of question definitions.
#[derive(Debug, Clone, Default)]
pub struct JsonQuestionCatalog {
    questions: HashMap<QuestionId, QuestionDefinition>,
}

impl JsonQuestionCatalog {
    pub fn from_questions(questions: Vec<QuestionDefinition>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(questions.len());
        for question in questions {
            let id = question.id;
            if by_id.insert(id, question).is_some() {
                bail!("duplicate question id {} in catalog", id);
            }
        }
        Ok(Self { questions: by_id })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionCatalog for JsonQuestionCatalog {
    fn question(&self, id: QuestionId) -> Option<&QuestionDefinition> {
        self.questions.get(&id)
    }
}

/// Load the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<JsonQuestionCatalog> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let questions: Vec<QuestionDefinition> = serde_json::from_str(&contents)
        .with_context(|| format!("parse catalog {}", path.display()))?;
    let catalog = JsonQuestionCatalog::from_questions(questions)
        .with_context(|| format!("index catalog {}", path.display()))?;
    debug!(questions = catalog.len(), path = %path.display(), "loaded question catalog");
    Ok(catalog)
}
