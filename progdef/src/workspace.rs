//! Resolved config and file locations for one CLI invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::io::catalog::{JsonQuestionCatalog, load_catalog};
use crate::io::config::{ProgramFiles, ProgramToolConfig, load_config};
use crate::io::program_store::{load_program, write_program};
use crate::program::ProgramDefinition;

/// Command-line overrides for configured file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOverrides {
    pub program_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProgramWorkspace {
    pub config: ProgramToolConfig,
    pub files: ProgramFiles,
}

impl ProgramWorkspace {
    /// Load config at `config_path` and resolve file paths relative to it.
    pub fn open(config_path: &Path, overrides: &FileOverrides) -> Result<Self> {
        let config = load_config(config_path)
            .with_context(|| format!("load config {}", config_path.display()))?;
        let base = config_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut files = config.files(base);
        if let Some(program_path) = &overrides.program_path {
            files.program_path = program_path.clone();
        }
        if let Some(catalog_path) = &overrides.catalog_path {
            files.catalog_path = catalog_path.clone();
        }
        Ok(Self { config, files })
    }

    pub fn load_catalog(&self) -> Result<JsonQuestionCatalog> {
        load_catalog(&self.files.catalog_path)
    }

    /// Load the catalog and the validated program.
    pub fn load(&self) -> Result<(JsonQuestionCatalog, ProgramDefinition)> {
        let catalog = self.load_catalog()?;
        let program = load_program(&self.files.program_path, &catalog)?;
        Ok((catalog, program))
    }

    pub fn save(&self, program: &ProgramDefinition) -> Result<()> {
        write_program(
            &self.files.program_path,
            program,
            self.config.normalize_on_write,
        )
    }
}
