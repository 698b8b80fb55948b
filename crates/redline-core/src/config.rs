//! Validation profile: the configurable expectations a document is checked
//! against. Immutable for the duration of one validation run.

use serde::{Deserialize, Serialize};

/// Named validation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationProfile {
    /// Display name of the profile.
    pub name: String,
    /// Language code passed to the grammar service (e.g. "en-US", "pl-PL").
    pub language: String,
    /// Whether the grammar rule runs at all.
    pub check_grammar: bool,
    /// Formatting expectations.
    pub formatting: FormattingSettings,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self {
            name: "Default University".to_string(),
            language: "pl-PL".to_string(),
            check_grammar: true,
            formatting: FormattingSettings::default(),
        }
    }
}

/// Font and layout expectations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingSettings {
    /// Body font expectations.
    pub font: FontSettings,
    /// Page layout and spacing expectations.
    pub layout: LayoutSettings,
}

/// Expected body font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Expected font family, compared case-insensitively.
    pub family: String,
    /// Expected body font size in points.
    pub size_pt: u32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Times New Roman".to_string(),
            size_pt: 12,
        }
    }
}

/// Page layout and paragraph spacing expectations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Expected left margin in centimeters.
    pub margin_left_cm: f64,
    /// Expected right margin in centimeters.
    pub margin_right_cm: f64,
    /// Required first-line indent in centimeters.
    pub required_indent_cm: f64,
    /// Allowed paragraph "spacing after" values, in points.
    pub allowed_spacing_after_pt: Vec<i32>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin_left_cm: 2.5,
            margin_right_cm: 2.5,
            required_indent_cm: 1.25,
            allowed_spacing_after_pt: vec![0, 6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = ValidationProfile::default();
        assert_eq!(profile.name, "Default University");
        assert_eq!(profile.language, "pl-PL");
        assert!(profile.check_grammar);
        assert_eq!(profile.formatting.font.family, "Times New Roman");
        assert_eq!(profile.formatting.font.size_pt, 12);
        assert_eq!(profile.formatting.layout.required_indent_cm, 1.25);
        assert_eq!(profile.formatting.layout.allowed_spacing_after_pt, vec![0, 6]);
    }

    #[test]
    fn test_profile_partial_deserialization() {
        // Omitted fields fall back to defaults.
        let profile: ValidationProfile = serde_json::from_str(
            r#"{"name": "Test Uni", "formatting": {"font": {"family": "Arial"}}}"#,
        )
        .unwrap();
        assert_eq!(profile.name, "Test Uni");
        assert_eq!(profile.formatting.font.family, "Arial");
        assert_eq!(profile.formatting.font.size_pt, 12);
        assert!(profile.check_grammar);
    }

    #[test]
    fn test_profile_roundtrip() {
        let profile = ValidationProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        let back: ValidationProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
