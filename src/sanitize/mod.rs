//! The background sanitizer: a markup gate, the threat detector, and the
//! declaration filter, feeding the contrast engine.
//!
//! Control flow: raw string -> markup gate -> threat check over the whole
//! input -> per-declaration filter -> text palette. Every step is a pure
//! function over its argument; rejections are ordinary results.

pub mod declaration;
pub mod decode;
pub mod markup;
pub mod threat;

use std::fmt;

use serde::Serialize;

use crate::contrast::{self, TextColorPalette};

use declaration::Dropped;
use markup::{AmmoniaStripper, MarkupStripper};

/// Why an input was rejected as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockReason {
    /// Markup, or a dangerous construct anywhere in the input.
    #[serde(rename = "Potentially dangerous content detected")]
    DangerousContent,
    /// Nothing survived the declaration filter.
    #[serde(rename = "Invalid or disallowed CSS properties")]
    NoAllowedDeclarations,
}

impl BlockReason {
    pub fn message(&self) -> &'static str {
        match self {
            BlockReason::DangerousContent => "Potentially dangerous content detected",
            BlockReason::NoAllowedDeclarations => "Invalid or disallowed CSS properties",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of sanitizing one background value.
///
/// `blocked` implies `css` is `None`; a `Some` css holds only allow-listed,
/// threat-free declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizeResult {
    pub css: Option<String>,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlockReason>,
    pub text_colors: TextColorPalette,
}

impl SanitizeResult {
    /// No background configured.
    pub fn empty() -> Self {
        Self {
            css: None,
            blocked: false,
            reason: None,
            text_colors: TextColorPalette::DARK_TEXT,
        }
    }

    pub fn blocked(reason: BlockReason) -> Self {
        Self {
            css: None,
            blocked: true,
            reason: Some(reason),
            text_colors: TextColorPalette::DARK_TEXT,
        }
    }

    pub fn accepted(css: String) -> Self {
        let text_colors = contrast::pick_text_colors(Some(&css));
        Self {
            css: Some(css),
            blocked: false,
            reason: None,
            text_colors,
        }
    }
}

/// Background sanitizer with a pluggable markup stripper.
pub struct BackgroundSanitizer {
    stripper: Box<dyn MarkupStripper>,
}

impl Default for BackgroundSanitizer {
    fn default() -> Self {
        Self::new(Box::new(AmmoniaStripper))
    }
}

impl BackgroundSanitizer {
    pub fn new(stripper: Box<dyn MarkupStripper>) -> Self {
        Self { stripper }
    }

    /// Sanitize one raw background value.
    ///
    /// A panic inside the stripper is not caught: it means the stripper is
    /// broken, not that the input is hostile.
    pub fn sanitize(&self, raw: Option<&str>) -> SanitizeResult {
        let trimmed = match raw.map(decode::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return SanitizeResult::empty(),
        };

        if markup::contains_markup(self.stripper.as_ref(), trimmed) {
            tracing::warn!(
                input = trimmed,
                stripper = self.stripper.name(),
                reason = %BlockReason::DangerousContent,
                "blocked background css: markup detected"
            );
            return SanitizeResult::blocked(BlockReason::DangerousContent);
        }

        if let Some(threat) = threat::find_threat(trimmed) {
            tracing::warn!(
                input = trimmed,
                rule = threat.rule,
                stage = %threat.stage,
                reason = %BlockReason::DangerousContent,
                "blocked background css"
            );
            return SanitizeResult::blocked(BlockReason::DangerousContent);
        }

        let filtered = declaration::filter_declarations(trimmed);
        for dropped in &filtered.dropped {
            match dropped {
                Dropped::Disallowed { property } => {
                    tracing::debug!(property = property.as_str(), "dropped disallowed property");
                }
                Dropped::Dangerous {
                    property,
                    value,
                    threat,
                } => {
                    tracing::warn!(
                        property = property.as_str(),
                        value = value.as_str(),
                        rule = threat.rule,
                        stage = %threat.stage,
                        "blocked dangerous background css value"
                    );
                }
            }
        }

        match filtered.join() {
            Some(css) => SanitizeResult::accepted(css),
            None => {
                tracing::warn!(
                    input = trimmed,
                    reason = %BlockReason::NoAllowedDeclarations,
                    "blocked background css: no allowed declarations"
                );
                SanitizeResult::blocked(BlockReason::NoAllowedDeclarations)
            }
        }
    }
}

/// Sanitize a raw background value with the default stripper.
pub fn sanitize_background(raw: Option<&str>) -> SanitizeResult {
    BackgroundSanitizer::default().sanitize(raw)
}

/// Like [`sanitize_background`], keeping only the css.
pub fn sanitize_background_css(raw: Option<&str>) -> Option<String> {
    sanitize_background(raw).css
}
