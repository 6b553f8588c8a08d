use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::audit::{AuditRecord, JsonlAuditLog};
use crate::config::BgsafeConfig;
use crate::error::Result;
use crate::profile::ProfileRecord;
use crate::sanitize::BackgroundSanitizer;

/// Counts from one scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub accepted: usize,
    pub empty: usize,
    pub blocked: usize,
    pub malformed: usize,
}

/// Sanitize every profile's background in a JSONL export.
pub fn run_scan(config: &BgsafeConfig, path: &Path) -> Result<()> {
    if !path.is_file() {
        eprintln!("bgsafe: path not found: {}", path.display());
        std::process::exit(1);
    }

    eprintln!("bgsafe: scanning {}...", path.display());

    let file = std::fs::File::open(path)?;
    let audit = config
        .audit
        .enabled
        .then(|| JsonlAuditLog::new(config.audit.log_path.clone()));
    let summary = scan_profiles(
        BufReader::new(file),
        &BackgroundSanitizer::default(),
        audit.as_ref(),
    )?;

    eprintln!(
        "bgsafe: {} profile(s) scanned: {} accepted, {} empty, {} blocked, {} malformed line(s)",
        summary.scanned, summary.accepted, summary.empty, summary.blocked, summary.malformed
    );

    if summary.blocked > 0 {
        eprintln!("\nbgsafe: {} background(s) blocked.", summary.blocked);
        std::process::exit(1);
    }
    eprintln!("bgsafe: scan clean -- no backgrounds blocked.");

    Ok(())
}

/// Scan JSONL profile records from `reader`. Blocked profiles are reported
/// on stderr and, when `audit` is given, appended to it.
pub fn scan_profiles<R: BufRead>(
    reader: R,
    sanitizer: &BackgroundSanitizer,
    audit: Option<&JsonlAuditLog>,
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let profile = match serde_json::from_str::<ProfileRecord>(trimmed) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping malformed line {}: {}", line_num + 1, e);
                summary.malformed += 1;
                continue;
            }
        };

        summary.scanned += 1;
        let result = sanitizer.sanitize(profile.custom_background.as_deref());

        match (result.reason, &result.css) {
            (Some(reason), _) => {
                summary.blocked += 1;
                eprintln!("  line {}: {}: {}", line_num + 1, profile.label(), reason);
                if let Some(log) = audit {
                    log.record(&AuditRecord::new(
                        profile.label(),
                        profile.custom_background.clone().unwrap_or_default(),
                        reason,
                    ));
                }
            }
            (None, Some(_)) => summary.accepted += 1,
            (None, None) => summary.empty += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{"id":"U1","slug":"ada","custom_background":"background-color: #123456"}
{"id":"U2","custom_background":null}
not json at all

{"id":"U3","slug":"mallory","custom_background":"background: url(javascript:alert(1))"}
{"id":"U4","custom_background":"color: red"}
"#;

    #[test]
    fn test_scan_counts() {
        let summary =
            scan_profiles(Cursor::new(EXPORT), &BackgroundSanitizer::default(), None).unwrap();
        assert_eq!(
            summary,
            ScanSummary {
                scanned: 4,
                accepted: 1,
                empty: 1,
                blocked: 2,
                malformed: 1,
            }
        );
    }

    #[test]
    fn test_scan_writes_audit_records() {
        let tmp = TempDir::new().unwrap();
        let log = JsonlAuditLog::new(tmp.path().join("audit.jsonl"));
        scan_profiles(Cursor::new(EXPORT), &BackgroundSanitizer::default(), Some(&log)).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "mallory");
        assert_eq!(records[0].reason, "Potentially dangerous content detected");
        assert_eq!(records[1].source, "U4");
        assert_eq!(records[1].input, "color: red");
    }
}
