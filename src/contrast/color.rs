use std::sync::LazyLock;

use regex::Regex;

static HEX6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})$")
        .expect("hex6 regex should compile")
});

static HEX3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#([0-9a-f])([0-9a-f])([0-9a-f])$").expect("hex3 regex should compile")
});

/// `rgb(`/`rgba(` with three integer channels; anything after the third
/// channel (alpha included) is ignored.
static RGB_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)")
        .expect("rgb regex should compile")
});

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `#RGB`, or `rgb()`/`rgba()`. Returns `None` for
    /// anything else, including named colors.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();

        if let Some(caps) = HEX6.captures(color) {
            return Some(Self::new(
                hex_channel(&caps[1])?,
                hex_channel(&caps[2])?,
                hex_channel(&caps[3])?,
            ));
        }

        if let Some(caps) = HEX3.captures(color) {
            return Some(Self::new(
                hex_channel(&caps[1].repeat(2))?,
                hex_channel(&caps[2].repeat(2))?,
                hex_channel(&caps[3].repeat(2))?,
            ));
        }

        if let Some(caps) = RGB_FN.captures(color) {
            return Some(Self::new(
                decimal_channel(&caps[1]),
                decimal_channel(&caps[2]),
                decimal_channel(&caps[3]),
            ));
        }

        None
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        let linear = |c: u8| {
            let s = f64::from(c) / 255.0;
            if s <= 0.03928 {
                s / 12.92
            } else {
                ((s + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

fn hex_channel(digits: &str) -> Option<u8> {
    u8::from_str_radix(digits, 16).ok()
}

/// Decimal channels above 255 clamp to 255.
fn decimal_channel(digits: &str) -> u8 {
    digits
        .parse::<u32>()
        .map_or(u8::MAX, |v| v.min(u32::from(u8::MAX)) as u8)
}

/// `(lighter + 0.05) / (darker + 0.05)`, always `>= 1`.
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let lighter = l1.max(l2);
    let darker = l1.min(l2);
    (lighter + 0.05) / (darker + 0.05)
}
