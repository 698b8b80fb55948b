//! Wire types for the LanguageTool `/v2/check` API.

use serde::{Deserialize, Serialize};

/// Response of a `/v2/check` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Service software info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<Software>,
    /// Language the text was checked as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageInfo>,
    /// The matches (issues) found in the text.
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// Service software identification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    /// Software name.
    #[serde(default)]
    pub name: String,
    /// Software version.
    #[serde(default)]
    pub version: String,
}

/// Language identification of a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Language code.
    #[serde(default)]
    pub code: String,
    /// Language detected from the text, when detection ran.
    #[serde(default, rename = "detectedLanguage", skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<DetectedLanguage>,
}

/// Detected-language info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Language code.
    #[serde(default)]
    pub code: String,
    /// Detection confidence 0.0-1.0.
    #[serde(default)]
    pub confidence: f64,
}

/// One issue found in the checked text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Issue description.
    #[serde(default)]
    pub message: String,
    /// Short issue description.
    #[serde(default, rename = "shortMessage")]
    pub short_message: String,
    /// Character offset of the issue within the checked text.
    #[serde(default)]
    pub offset: usize,
    /// Length of the affected text.
    #[serde(default)]
    pub length: usize,
    /// Suggested replacements, best first.
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    /// Context snippet around the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MatchContext>,
    /// The sentence containing the issue.
    #[serde(default)]
    pub sentence: String,
    /// The rule that produced the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
}

/// A suggested replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    /// Replacement text.
    #[serde(default)]
    pub value: String,
}

/// Context snippet around a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    /// The snippet text.
    #[serde(default)]
    pub text: String,
    /// Offset of the issue within the snippet.
    #[serde(default)]
    pub offset: usize,
    /// Length of the issue within the snippet.
    #[serde(default)]
    pub length: usize,
}

/// The service rule behind a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Rule id.
    #[serde(default)]
    pub id: String,
    /// Rule description.
    #[serde(default)]
    pub description: String,
    /// Issue type (e.g. "misspelling", "grammar").
    #[serde(default, rename = "issueType")]
    pub issue_type: String,
    /// Rule category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RuleCategory>,
}

/// Category of a service rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCategory {
    /// Category id (e.g. "TYPOS", "GRAMMAR").
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}
