//! # Redline Core - shared validation types
//!
//! Core types shared by the redline document validator: findings and their
//! document locations, the validation profile a document is checked against,
//! and the workspace error enum.
//!
//! Measurement conventions used across the workspace:
//!
//! - Font sizes are stored in **half-points** in OOXML and exposed in points.
//! - Indentation and spacing are stored in **twips** (1/20 pt; 1440 per inch,
//!   567 per centimeter).
//! - Line spacing is stored in 240ths of a line; 1.5 lines is the literal
//!   value 360 under the "auto" rule.

pub mod config;
pub mod error;
pub mod finding;

pub use config::{FontSettings, FormattingSettings, LayoutSettings, ValidationProfile};
pub use error::{RedlineError, Result};
pub use finding::{truncate_preview, Finding, GrammarIssueKind, HeadingInfo, Location};

/// Twips per centimeter (1440 per inch / 2.54).
pub const TWIPS_PER_CM: f64 = 567.0;

/// Twips per point.
pub const TWIPS_PER_PT: i32 = 20;

/// Convert twips to centimeters for display.
#[inline]
#[must_use]
pub fn twips_to_cm(twips: i32) -> f64 {
    f64::from(twips) / 1440.0 * 2.54
}
