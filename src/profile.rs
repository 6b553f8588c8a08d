use serde::{Deserialize, Serialize};

use crate::contrast::TextColorPalette;
use crate::sanitize::{BackgroundSanitizer, BlockReason, SanitizeResult};

/// The slice of a backend profile row the background sanitizer cares about.
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub custom_background: Option<String>,
}

impl ProfileRecord {
    /// Human-facing identifier: the slug when present, else the id.
    pub fn label(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.id)
    }
}

/// Background data handed to the profile page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileBackground {
    pub background_style: Option<String>,
    pub background_blocked: bool,
    pub background_blocked_reason: Option<BlockReason>,
    pub text_colors: TextColorPalette,
}

impl From<SanitizeResult> for ProfileBackground {
    fn from(result: SanitizeResult) -> Self {
        Self {
            background_style: result.css,
            background_blocked: result.blocked,
            background_blocked_reason: result.reason,
            text_colors: result.text_colors,
        }
    }
}

impl ProfileBackground {
    pub fn for_profile(sanitizer: &BackgroundSanitizer, profile: &ProfileRecord) -> Self {
        sanitizer
            .sanitize(profile.custom_background.as_deref())
            .into()
    }

    /// Inline `style` attribute value: the sanitized css, then the text
    /// palette as custom properties.
    pub fn style_attribute(&self) -> String {
        let vars = self.text_colors.css_variables();
        match &self.background_style {
            Some(css) => format!("{css}; {vars}"),
            None => vars,
        }
    }

    /// Notice shown to the profile owner when their background was rejected.
    pub fn owner_notice(&self) -> Option<String> {
        self.background_blocked_reason
            .map(|reason| format!("Your custom background was not applied: {reason}"))
    }
}
