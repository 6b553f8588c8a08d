use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BgsafeError, Result};

/// Returns the global config directory path: `~/.config/bgsafe/`
pub fn dirs_global() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("bgsafe")
}

/// Top-level configuration. Covers where rejections are recorded and how
/// results are printed; the sanitizer's own rule sets are not configurable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgsafeConfig {
    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl BgsafeConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| BgsafeError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load config from the project root. Checks `.bgsafe/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&Self::project_path(project_root))
    }

    /// Project config if present, otherwise the global one.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let project = Self::project_path(project_root);
        if project.exists() {
            return Self::load_from(&project);
        }
        Self::load_from(&dirs_global().join("config.yml"))
    }

    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(".bgsafe").join("config.yml")
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Audit trail for rejected backgrounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append rejections to `log_path`. Default: true.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// JSONL file rejections are appended to. Relative paths resolve
    /// against the working directory.
    #[serde(default = "default_audit_path")]
    pub log_path: PathBuf,
}

fn default_audit_enabled() -> bool {
    true
}
fn default_audit_path() -> PathBuf {
    PathBuf::from(".bgsafe").join("audit.jsonl")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How `check` prints a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The full result as JSON.
    #[default]
    Json,
    /// One human-readable line.
    Text,
    /// The inline style attribute value.
    Style,
}
