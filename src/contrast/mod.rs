pub mod color;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use color::{contrast_ratio, Rgb};

static BACKGROUND_COLOR_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background-color\s*:\s*([^;]+)")
        .expect("background-color regex should compile")
});

static BACKGROUND_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background\s*:\s*([^;]+)").expect("background regex should compile")
});

static COLOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(#[0-9a-f]{3,6}|rgba?\s*\([^)]+\))").expect("color token regex should compile")
});

/// Text colors to overlay on a background. Only the two associated
/// constants exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextColorPalette {
    primary: &'static str,
    secondary: &'static str,
    muted: &'static str,
    border: &'static str,
}

impl TextColorPalette {
    /// Dark text for light backgrounds. The default.
    pub const DARK_TEXT: TextColorPalette = TextColorPalette {
        primary: "#111827",
        secondary: "#374151",
        muted: "#6b7280",
        border: "#e5e7eb",
    };

    /// Light text for dark backgrounds.
    pub const LIGHT_TEXT: TextColorPalette = TextColorPalette {
        primary: "#ffffff",
        secondary: "#e5e7eb",
        muted: "#d1d5db",
        border: "#4b5563",
    };

    pub fn primary(&self) -> &'static str {
        self.primary
    }

    pub fn secondary(&self) -> &'static str {
        self.secondary
    }

    pub fn muted(&self) -> &'static str {
        self.muted
    }

    pub fn border(&self) -> &'static str {
        self.border
    }

    pub fn is_light_text(&self) -> bool {
        *self == Self::LIGHT_TEXT
    }

    /// The palette as CSS custom properties, e.g. `--text-primary: #111827; ...`.
    pub fn css_variables(&self) -> String {
        format!(
            "--text-primary: {}; --text-secondary: {}; --text-muted: {}; --border-color: {}",
            self.primary, self.secondary, self.muted, self.border
        )
    }
}

impl Default for TextColorPalette {
    fn default() -> Self {
        Self::DARK_TEXT
    }
}

/// Pull a representative color out of a sanitized declaration list.
///
/// `background-color` wins; otherwise the first hex or `rgb()`/`rgba()`
/// token inside a `background` value.
pub fn extract_background_color(css: &str) -> Option<&str> {
    if let Some(caps) = BACKGROUND_COLOR_DECL.captures(css) {
        return caps.get(1).map(|m| m.as_str().trim());
    }

    let value = BACKGROUND_DECL.captures(css)?.get(1)?.as_str().trim();
    COLOR_TOKEN.captures(value)?.get(1).map(|m| m.as_str())
}

/// Palette whose text contrasts best with `color`, or the default when
/// `color` does not parse.
pub fn contrasting_palette(color: &str) -> TextColorPalette {
    let Some(rgb) = Rgb::parse(color) else {
        return TextColorPalette::DARK_TEXT;
    };

    let bg = rgb.luminance();
    let white_contrast = contrast_ratio(bg, Rgb::WHITE.luminance());
    let black_contrast = contrast_ratio(bg, Rgb::BLACK.luminance());

    if white_contrast > black_contrast {
        TextColorPalette::LIGHT_TEXT
    } else {
        TextColorPalette::DARK_TEXT
    }
}

/// Choose text colors for a sanitized background.
pub fn pick_text_colors(sanitized_css: Option<&str>) -> TextColorPalette {
    sanitized_css
        .and_then(extract_background_color)
        .map(contrasting_palette)
        .unwrap_or(TextColorPalette::DARK_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefers_background_color() {
        let css = "background: #000000; background-color: #ffffff";
        assert_eq!(extract_background_color(css), Some("#ffffff"));
    }

    #[test]
    fn test_extract_from_shorthand() {
        let css = "background: url(x.png) no-repeat rgb(1, 2, 3)";
        assert_eq!(extract_background_color(css), Some("rgb(1, 2, 3)"));
    }

    #[test]
    fn test_extract_none_without_literal_color() {
        assert_eq!(extract_background_color("background: linear-gradient(red, blue)"), None);
        assert_eq!(extract_background_color("background-image: none"), None);
    }

    #[test]
    fn test_named_background_color_falls_back() {
        assert_eq!(pick_text_colors(Some("background-color: navy")), TextColorPalette::DARK_TEXT);
    }

    #[test]
    fn test_black_and_white() {
        assert_eq!(contrasting_palette("#000000"), TextColorPalette::LIGHT_TEXT);
        assert_eq!(contrasting_palette("#ffffff"), TextColorPalette::DARK_TEXT);
    }

    #[test]
    fn test_mid_grey_boundary() {
        // #757575 is dark enough for white text; #767676 is not.
        assert_eq!(contrasting_palette("#757575"), TextColorPalette::LIGHT_TEXT);
        assert_eq!(contrasting_palette("#767676"), TextColorPalette::DARK_TEXT);
    }

    #[test]
    fn test_none_css_is_default() {
        assert_eq!(pick_text_colors(None), TextColorPalette::default());
    }

    #[test]
    fn test_css_variables() {
        assert_eq!(
            TextColorPalette::LIGHT_TEXT.css_variables(),
            concat!(
                "--text-primary: #ffffff; --text-secondary: #e5e7eb; ",
                "--text-muted: #d1d5db; --border-color: #4b5563",
            )
        );
    }
}
