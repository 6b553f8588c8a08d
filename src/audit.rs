use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sanitize::BlockReason;

/// One rejected background, kept for later security review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    /// Where the input came from: a profile label, `argument` or `stdin`.
    pub source: String,
    /// The input exactly as received.
    pub input: String,
    pub reason: String,
}

impl AuditRecord {
    pub fn new(source: impl Into<String>, input: impl Into<String>, reason: BlockReason) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

/// Append-only JSONL audit log.
pub struct JsonlAuditLog {
    path: PathBuf,
}

impl JsonlAuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, creating parent dirs if needed.
    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Append without failing the caller. Errors are logged and dropped.
    pub fn record(&self, record: &AuditRecord) {
        if let Err(e) = self.append(record) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write audit record"
            );
        }
    }

    /// Read every record back, skipping malformed lines.
    pub fn read_all(&self) -> Result<Vec<AuditRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "skipping malformed line {} in {}: {}",
                        line_num + 1,
                        self.path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }
}
