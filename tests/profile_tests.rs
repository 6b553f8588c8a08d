//! Profile-page projection of sanitize results.

use bgsafe::profile::{ProfileBackground, ProfileRecord};
use bgsafe::{BackgroundSanitizer, BlockReason, TextColorPalette};

fn record(json: &str) -> ProfileRecord {
    serde_json::from_str(json).unwrap()
}

#[test]
fn profile_without_background_renders_palette_only() {
    let profile = record(r#"{"id":"U1","slug":"ada"}"#);
    let bg = ProfileBackground::for_profile(&BackgroundSanitizer::default(), &profile);
    assert_eq!(bg.background_style, None);
    assert!(!bg.background_blocked);
    assert_eq!(bg.style_attribute(), TextColorPalette::DARK_TEXT.css_variables());
}

#[test]
fn blocked_profile_exposes_reason_to_owner() {
    let profile = record(concat!(
        r#"{"id":"U2","custom_background":"#,
        r#""background: url('data:image/svg+xml,<svg onload=alert(1)>')"}"#,
    ));
    let bg = ProfileBackground::for_profile(&BackgroundSanitizer::default(), &profile);
    assert!(bg.background_blocked);
    assert_eq!(bg.background_blocked_reason, Some(BlockReason::DangerousContent));
    assert!(bg.owner_notice().unwrap().contains("Potentially dangerous content detected"));
}

#[test]
fn page_data_serializes_with_reason_text() {
    let profile = record(r#"{"id":"U3","custom_background":"z-index: 10"}"#);
    let bg = ProfileBackground::for_profile(&BackgroundSanitizer::default(), &profile);
    let json = serde_json::to_value(&bg).unwrap();
    assert_eq!(json["background_style"], serde_json::Value::Null);
    assert_eq!(json["background_blocked"], true);
    assert_eq!(
        json["background_blocked_reason"],
        "Invalid or disallowed CSS properties"
    );
    assert_eq!(json["text_colors"]["border"], "#e5e7eb");
}

#[test]
fn dark_background_switches_overlay_text() {
    let profile = record(r#"{"id":"U4","custom_background":"background-color: rgb(15, 23, 42)"}"#);
    let bg = ProfileBackground::for_profile(&BackgroundSanitizer::default(), &profile);
    assert_eq!(bg.text_colors, TextColorPalette::LIGHT_TEXT);
    assert_eq!(
        bg.style_attribute(),
        format!(
            "background-color: rgb(15, 23, 42); {}",
            TextColorPalette::LIGHT_TEXT.css_variables()
        )
    );
}
