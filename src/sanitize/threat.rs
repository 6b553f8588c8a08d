use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::RegexSet;
use serde::Serialize;

use crate::error::{BgsafeError, Result};

use super::decode::{DecodeStage, Variants};

/// How a rule recognises its construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Case-insensitive substring.
    Literal(&'static str),
    /// Case-insensitive regular expression.
    Pattern(&'static str),
}

/// A single named entry of the dangerous pattern set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatRule {
    pub name: &'static str,
    pub matcher: Matcher,
}

/// The closed, ordered set of constructs a background value may never contain.
pub const THREAT_RULES: &[ThreatRule] = &[
    ThreatRule {
        name: "javascript-url",
        matcher: Matcher::Literal("javascript:"),
    },
    ThreatRule {
        name: "vbscript-url",
        matcher: Matcher::Literal("vbscript:"),
    },
    ThreatRule {
        name: "css-expression",
        matcher: Matcher::Pattern(r"expression\s*\("),
    },
    ThreatRule {
        name: "behavior",
        matcher: Matcher::Pattern(r"behavior\s*:"),
    },
    ThreatRule {
        name: "moz-binding",
        matcher: Matcher::Literal("-moz-binding"),
    },
    ThreatRule {
        name: "data-url",
        matcher: Matcher::Pattern(r#"url\s*\(\s*["']?\s*data:"#),
    },
    ThreatRule {
        name: "import",
        matcher: Matcher::Literal("@import"),
    },
    ThreatRule {
        name: "script-open",
        matcher: Matcher::Literal("<script"),
    },
    ThreatRule {
        name: "script-close",
        matcher: Matcher::Literal("</script"),
    },
    ThreatRule {
        name: "html-entity",
        matcher: Matcher::Literal("&#"),
    },
    ThreatRule {
        name: "percent-escape",
        matcher: Matcher::Pattern(r"%[0-9a-f]{2}"),
    },
    ThreatRule {
        name: "backslash",
        matcher: Matcher::Literal("\\"),
    },
];

static BUILTIN: LazyLock<ThreatPatterns> = LazyLock::new(|| {
    ThreatPatterns::compile(THREAT_RULES).expect("built-in threat rules should compile")
});

/// Which rule fired, and on which decode stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreatMatch {
    pub rule: &'static str,
    pub stage: DecodeStage,
}

/// Compiled form of a rule list: literals go through one aho-corasick
/// automaton, patterns through one `RegexSet`.
pub struct ThreatPatterns {
    rules: Vec<ThreatRule>,
    literals: AhoCorasick,
    /// Automaton pattern id -> index into `rules`.
    literal_rules: Vec<usize>,
    patterns: RegexSet,
    /// RegexSet index -> index into `rules`.
    pattern_rules: Vec<usize>,
}

impl ThreatPatterns {
    /// The process-wide compiled rule set.
    pub fn builtin() -> &'static ThreatPatterns {
        &BUILTIN
    }

    fn compile(rules: &[ThreatRule]) -> Result<Self> {
        let mut literal_strs = Vec::new();
        let mut literal_rules = Vec::new();
        let mut pattern_strs = Vec::new();
        let mut pattern_rules = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            match rule.matcher {
                Matcher::Literal(lit) => {
                    literal_strs.push(lit);
                    literal_rules.push(idx);
                }
                Matcher::Pattern(pat) => {
                    pattern_strs.push(format!("(?i){pat}"));
                    pattern_rules.push(idx);
                }
            }
        }

        let literals = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&literal_strs)
            .map_err(|e| BgsafeError::InvalidPattern {
                pattern: literal_strs.join(", "),
                reason: e.to_string(),
            })?;
        let patterns = RegexSet::new(&pattern_strs).map_err(|e| BgsafeError::InvalidPattern {
            pattern: pattern_strs.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self {
            rules: rules.to_vec(),
            literals,
            literal_rules,
            patterns,
            pattern_rules,
        })
    }

    pub fn rules(&self) -> &[ThreatRule] {
        &self.rules
    }

    /// Earliest rule (in rule order) matching `candidate` verbatim.
    pub fn first_match(&self, candidate: &str) -> Option<&ThreatRule> {
        let literal_hit = self
            .literals
            .find_overlapping_iter(candidate)
            .map(|m| self.literal_rules[m.pattern().as_usize()])
            .min();
        let pattern_hit = self
            .patterns
            .matches(candidate)
            .into_iter()
            .map(|i| self.pattern_rules[i])
            .min();

        let idx = match (literal_hit, pattern_hit) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return None,
        };
        self.rules.get(idx)
    }

    /// Test every decode stage of `value` against every rule.
    pub fn find_threat(&self, value: &str) -> Option<ThreatMatch> {
        let variants = Variants::of(value);
        let found = variants.iter().find_map(|(stage, candidate)| {
            self.first_match(candidate).map(|rule| ThreatMatch {
                rule: rule.name,
                stage,
            })
        });
        found
    }
}

/// Report the first dangerous construct in `value`, if any.
pub fn find_threat(value: &str) -> Option<ThreatMatch> {
    ThreatPatterns::builtin().find_threat(value)
}

/// Whether `value` contains a disallowed construct, even under obfuscation.
pub fn is_dangerous(value: &str) -> bool {
    find_threat(value).is_some()
}
