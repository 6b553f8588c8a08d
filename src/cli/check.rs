use std::io::Read;

use crate::audit::{AuditRecord, JsonlAuditLog};
use crate::config::{BgsafeConfig, OutputFormat};
use crate::error::Result;
use crate::profile::ProfileBackground;
use crate::sanitize::{sanitize_background, SanitizeResult};

/// Sanitize one background value from an argument or stdin and print it.
pub fn run_check(
    config: &BgsafeConfig,
    css: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let (source, input) = match css {
        Some(value) if value != "-" => ("argument", value.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            ("stdin", buf)
        }
    };

    let result = sanitize_background(Some(&input));
    println!("{}", render(&result, format.unwrap_or(config.output.format))?);

    if let Some(reason) = result.reason {
        if config.audit.enabled {
            JsonlAuditLog::new(config.audit.log_path.clone())
                .record(&AuditRecord::new(source, input, reason));
        }
        eprintln!("bgsafe: background blocked: {}", reason);
        std::process::exit(1);
    }

    Ok(())
}

/// Format a result for printing.
pub fn render(result: &SanitizeResult, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Text => match (&result.css, result.reason) {
            (_, Some(reason)) => format!("blocked: {reason}"),
            (Some(css), None) => {
                let text = if result.text_colors.is_light_text() {
                    "light"
                } else {
                    "dark"
                };
                format!("ok: {css} (text: {text})")
            }
            (None, None) => "empty: no background".to_string(),
        },
        OutputFormat::Style => ProfileBackground::from(result.clone()).style_attribute(),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::BlockReason;

    #[test]
    fn test_render_text() {
        let ok = SanitizeResult::accepted("background-color: #000".into());
        assert_eq!(
            render(&ok, OutputFormat::Text).unwrap(),
            "ok: background-color: #000 (text: light)"
        );
        let blocked = SanitizeResult::blocked(BlockReason::DangerousContent);
        assert_eq!(
            render(&blocked, OutputFormat::Text).unwrap(),
            "blocked: Potentially dangerous content detected"
        );
        assert_eq!(
            render(&SanitizeResult::empty(), OutputFormat::Text).unwrap(),
            "empty: no background"
        );
    }

    #[test]
    fn test_render_json() {
        let ok = SanitizeResult::accepted("background: red".into());
        let json: serde_json::Value =
            serde_json::from_str(&render(&ok, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["css"], "background: red");
        assert_eq!(json["text_colors"]["primary"], "#111827");
    }
}
