use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};
use serde::Serialize;

static DECIMAL_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").expect("decimal entity regex should compile"));

static HEX_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#x([0-9a-fA-F]+);").expect("hex entity regex should compile")
});

/// Named entities, applied one after another in this order.
static NAMED_ENTITIES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("lt", "<"),
        ("gt", ">"),
        ("amp", "&"),
        ("quot", "\""),
        ("apos", "'"),
    ]
    .into_iter()
    .map(|(name, replacement)| {
        let re = Regex::new(&format!("(?i)&{name};")).expect("named entity regex should compile");
        (re, replacement)
    })
    .collect()
});

/// Which decoding depth a candidate string was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStage {
    /// The input exactly as supplied.
    Raw,
    /// URL-decoded, then HTML-entity-decoded.
    Decoded,
    /// `Decoded` with every backslash removed.
    Unescaped,
    /// `Unescaped` with whitespace removed and lower-cased.
    Normalized,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::Raw => write!(f, "raw"),
            DecodeStage::Decoded => write!(f, "decoded"),
            DecodeStage::Unescaped => write!(f, "unescaped"),
            DecodeStage::Normalized => write!(f, "normalized"),
        }
    }
}

/// The four strings every threat check runs against.
#[derive(Debug, Clone)]
pub struct Variants<'a> {
    pub raw: &'a str,
    pub decoded: String,
    pub unescaped: String,
    pub normalized: String,
}

impl<'a> Variants<'a> {
    /// Run the decode chain over `value`. Each step feeds the next.
    pub fn of(value: &'a str) -> Self {
        let decoded = decode_html_entities(&url_decode(value));
        let unescaped = remove_escapes(&decoded).into_owned();
        let normalized = normalize(&unescaped);
        Self {
            raw: value,
            decoded,
            unescaped,
            normalized,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DecodeStage, &str)> {
        [
            (DecodeStage::Raw, self.raw),
            (DecodeStage::Decoded, self.decoded.as_str()),
            (DecodeStage::Unescaped, self.unescaped.as_str()),
            (DecodeStage::Normalized, self.normalized.as_str()),
        ]
        .into_iter()
    }
}

/// Percent-decode `%XX` sequences as UTF-8.
///
/// A `%` that is not followed by two hex digits, or decoded bytes that do not
/// form valid UTF-8, make the whole input come back unchanged.
pub fn url_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut decoded = Vec::with_capacity(len);
    let mut i = 0;

    while i < len {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_val);
            let lo = bytes.get(i + 2).copied().and_then(hex_val);
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    decoded.push(hi << 4 | lo);
                    i += 3;
                    continue;
                }
                _ => return Cow::Borrowed(input),
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    match String::from_utf8(decoded) {
        Ok(s) => Cow::Owned(s),
        Err(_) => Cow::Borrowed(input),
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode `&#NN;`, `&#xHH;` and the five named entities.
///
/// Passes run in sequence (decimal, hex, then each named entity), so an
/// entity produced by an earlier pass is decoded by a later one. Numeric
/// entities that do not name a valid scalar value stay as written.
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let decimal = DECIMAL_ENTITY.replace_all(input, |caps: &Captures| {
        numeric_entity(&caps[0], &caps[1], 10)
    });
    let mut result = HEX_ENTITY
        .replace_all(&decimal, |caps: &Captures| numeric_entity(&caps[0], &caps[1], 16))
        .into_owned();

    for (re, replacement) in NAMED_ENTITIES.iter() {
        result = re.replace_all(&result, NoExpand(*replacement)).into_owned();
    }

    result
}

fn numeric_entity(whole: &str, digits: &str, radix: u32) -> String {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| whole.to_string())
}

/// Strip every backslash, collapsing CSS escape runs like `jav\\ascript`.
pub fn remove_escapes(input: &str) -> Cow<'_, str> {
    if input.contains('\\') {
        Cow::Owned(input.replace('\\', ""))
    } else {
        Cow::Borrowed(input)
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Trim whitespace and byte-order marks from both ends.
pub fn trim(input: &str) -> &str {
    input.trim_matches(is_blank)
}

/// Remove all whitespace and lower-case.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !is_blank(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode_basic() {
        assert_eq!(url_decode("java%73cript%3A"), "javascript:");
    }

    #[test]
    fn test_url_decode_multibyte() {
        assert_eq!(url_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn test_url_decode_malformed_keeps_original() {
        // One bad escape leaves the whole input undecoded.
        assert_eq!(url_decode("%41 then 100%"), "%41 then 100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_url_decode_invalid_utf8_keeps_original() {
        assert_eq!(url_decode("%C3%28"), "%C3%28");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_html_entities("jav&#97;script"), "javascript");
        assert_eq!(decode_html_entities("jav&#x61;script"), "javascript");
    }

    #[test]
    fn test_decode_named_entities_case_insensitive() {
        assert_eq!(decode_html_entities("&LT;script&gt;"), "<script>");
        assert_eq!(decode_html_entities("&quot;&apos;"), "\"'");
    }

    #[test]
    fn test_decode_passes_chain() {
        // &amp; becomes &, and the quot pass then sees &quot;
        assert_eq!(decode_html_entities("&amp;quot;"), "\"");
        // decimal pass yields a hex entity the hex pass then decodes
        assert_eq!(decode_html_entities("&#38;#x61;"), "a");
    }

    #[test]
    fn test_decode_out_of_range_entity_left_alone() {
        assert_eq!(decode_html_entities("&#99999999999;"), "&#99999999999;");
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn test_remove_escapes() {
        assert_eq!(remove_escapes(r"jav\\\ascript"), "javascript");
        assert!(matches!(remove_escapes("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_trim_strips_bom() {
        assert_eq!(trim("\u{feff} background \u{feff}\n"), "background");
        assert_eq!(trim("\u{feff}"), "");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Java Script :\n\tX"), "javascript:x");
    }

    #[test]
    fn test_variants_chain() {
        let v = Variants::of("J%41v&#97;\\ script");
        assert_eq!(v.raw, "J%41v&#97;\\ script");
        assert_eq!(v.decoded, "JAva\\ script");
        assert_eq!(v.unescaped, "JAva script");
        assert_eq!(v.normalized, "javascript");
        assert_eq!(v.iter().count(), 4);
    }
}
