//! Tool configuration stored in `progdef.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "progdef.toml";

/// Tool configuration (TOML).
///
/// Relative paths are resolved against the directory holding the config
/// file. Missing fields default to the values below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgramToolConfig {
    /// Program definition JSON file the commands read and write.
    pub program_path: PathBuf,

    /// Question catalog JSON file used to hydrate question usages.
    pub catalog_path: PathBuf,

    /// Write programs back in canonical block order.
    pub normalize_on_write: bool,

    /// Treat predicate ordering violations as a `validate` failure.
    pub strict_predicate_ordering: bool,
}

impl Default for ProgramToolConfig {
    fn default() -> Self {
        Self {
            program_path: PathBuf::from("program.json"),
            catalog_path: PathBuf::from("questions.json"),
            normalize_on_write: true,
            strict_predicate_ordering: false,
        }
    }
}

impl ProgramToolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program_path.as_os_str().is_empty() {
            return Err(anyhow!("program_path must be non-empty"));
        }
        if self.catalog_path.as_os_str().is_empty() {
            return Err(anyhow!("catalog_path must be non-empty"));
        }
        Ok(())
    }

    /// Resolve the configured files against `base`.
    pub fn files(&self, base: &Path) -> ProgramFiles {
        ProgramFiles {
            program_path: base.join(&self.program_path),
            catalog_path: base.join(&self.catalog_path),
        }
    }
}

/// Resolved file locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFiles {
    pub program_path: PathBuf,
    pub catalog_path: PathBuf,
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ProgramToolConfig::default()`.
pub fn load_config(path: &Path) -> Result<ProgramToolConfig> {
    if !path.exists() {
        let cfg = ProgramToolConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProgramToolConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ProgramToolConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ProgramToolConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("progdef.toml");
        let cfg = ProgramToolConfig {
            strict_predicate_ordering: true,
            ..ProgramToolConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("progdef.toml");
        fs::write(&path, "catalog_path = \"catalog/questions.json\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.catalog_path, PathBuf::from("catalog/questions.json"));
        assert_eq!(cfg.program_path, PathBuf::from("program.json"));
        assert!(cfg.normalize_on_write);
    }

    #[test]
    fn empty_path_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("progdef.toml");
        fs::write(&path, "program_path = \"\"\n").expect("write");
        let err = load_config(&path).expect_err("load should fail");
        assert!(err.to_string().contains("program_path"));
    }

    #[test]
    fn files_resolve_against_base() {
        let files = ProgramToolConfig::default().files(Path::new("/srv/programs"));
        assert_eq!(files.program_path, PathBuf::from("/srv/programs/program.json"));
        assert_eq!(files.catalog_path, PathBuf::from("/srv/programs/questions.json"));
    }
}
