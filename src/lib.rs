//! Sanitizer for user-supplied profile background CSS.
//!
//! [`sanitize::sanitize_background`] turns an untrusted declaration list into
//! either a restricted, allow-listed css string or a rejection, and picks a
//! text palette that stays readable on top of the resulting background.

pub mod audit;
pub mod cli;
pub mod config;
pub mod contrast;
pub mod error;
pub mod profile;
pub mod sanitize;

pub use contrast::TextColorPalette;
pub use sanitize::{
    sanitize_background, sanitize_background_css, BackgroundSanitizer, BlockReason,
    SanitizeResult,
};
