use std::fmt;

use super::{decode, threat};

/// The only CSS properties a sanitized background may carry.
pub const ALLOWED_PROPERTIES: &[&str] = &[
    "background",
    "background-color",
    "background-image",
    "background-position",
    "background-size",
    "background-repeat",
    "background-attachment",
    "background-origin",
    "background-clip",
];

pub fn is_allowed_property(property: &str) -> bool {
    ALLOWED_PROPERTIES.contains(&property)
}

/// One `property: value` pair. The property is trimmed and lower-cased;
/// the value is trimmed with its case kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub property: String,
    pub value: &'a str,
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// Split a declaration list on `;` and each piece on its first `:`.
///
/// Empty segments and segments without a colon are skipped.
pub fn parse_declarations(input: &str) -> Vec<Declaration<'_>> {
    input
        .split(';')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let (property, value) = segment.split_once(':')?;
            Some(Declaration {
                property: decode::trim(property).to_lowercase(),
                value: decode::trim(value),
            })
        })
        .collect()
}

/// Why a parsed declaration was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropped {
    /// Property not in [`ALLOWED_PROPERTIES`].
    Disallowed { property: String },
    /// Value tripped a threat rule.
    Dangerous {
        property: String,
        value: String,
        threat: threat::ThreatMatch,
    },
}

/// Outcome of filtering one declaration list.
#[derive(Debug, Default)]
pub struct Filtered<'a> {
    pub kept: Vec<Declaration<'a>>,
    pub dropped: Vec<Dropped>,
}

impl Filtered<'_> {
    /// Reassemble the kept declarations, in input order, joined by `"; "`.
    pub fn join(&self) -> Option<String> {
        if self.kept.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.kept.iter().map(ToString::to_string).collect();
        Some(parts.join("; "))
    }
}

/// Keep only allow-listed declarations whose values pass the threat check.
pub fn filter_declarations(input: &str) -> Filtered<'_> {
    let mut filtered = Filtered::default();

    for decl in parse_declarations(input) {
        if !is_allowed_property(&decl.property) {
            filtered.dropped.push(Dropped::Disallowed {
                property: decl.property,
            });
            continue;
        }
        if let Some(threat) = threat::find_threat(decl.value) {
            filtered.dropped.push(Dropped::Dangerous {
                property: decl.property,
                value: decl.value.to_string(),
                threat,
            });
            continue;
        }
        filtered.kept.push(decl);
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_lowercases_property() {
        let decls = parse_declarations("  Background-Color :  #ABC  ;;BACKGROUND:Red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "background-color");
        assert_eq!(decls[0].value, "#ABC");
        assert_eq!(decls[1].property, "background");
        assert_eq!(decls[1].value, "Red");
    }

    #[test]
    fn test_parse_trims_bom() {
        let decls = parse_declarations("\u{feff}background:\u{feff} red");
        assert_eq!(decls[0].property, "background");
        assert_eq!(decls[0].value, "red");
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let decls = parse_declarations("background-image: url(https://example.com/x.png)");
        assert_eq!(decls[0].value, "url(https://example.com/x.png)");
    }

    #[test]
    fn test_parse_skips_segments_without_colon() {
        let decls = parse_declarations("garbage; background: blue");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "background");
    }

    #[test]
    fn test_empty_value_survives() {
        let filtered = filter_declarations("background-color:");
        assert_eq!(filtered.join().as_deref(), Some("background-color: "));
    }

    #[test]
    fn test_disallowed_property_dropped() {
        let filtered = filter_declarations("color: red; background: blue");
        assert_eq!(filtered.join().as_deref(), Some("background: blue"));
        assert_eq!(
            filtered.dropped,
            vec![Dropped::Disallowed {
                property: "color".into()
            }]
        );
    }

    #[test]
    fn test_dangerous_value_dropped_alone() {
        let filtered =
            filter_declarations("background-image: url('data:text/html,x'); background: red");
        assert_eq!(filtered.join().as_deref(), Some("background: red"));
        assert!(matches!(
            &filtered.dropped[0],
            Dropped::Dangerous { threat, .. } if threat.rule == "data-url"
        ));
    }

    #[test]
    fn test_nothing_kept_joins_to_none() {
        assert_eq!(filter_declarations("width: 10px").join(), None);
    }

    #[test]
    fn test_allowed_properties_are_lowercase() {
        for p in ALLOWED_PROPERTIES {
            assert_eq!(*p, p.to_lowercase());
            assert!(is_allowed_property(p));
        }
        assert!(!is_allowed_property("Background"));
    }
}
