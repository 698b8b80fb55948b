//! Finding and location types produced by validation rules.

use serde::{Deserialize, Serialize};

/// Approximate lines rendered per A4 page at thesis formatting (12pt, 1.5
/// line spacing). Used only for the heuristic page/line display values.
const LINES_PER_PAGE: usize = 40;

/// Approximate rendered lines contributed by one body paragraph.
const LINES_PER_PARAGRAPH: usize = 3;

/// One reported rule violation or advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the rule that produced this finding (stable identifier, also
    /// used for rule selection).
    pub rule: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// `true` for violations, `false` for advisories (e.g. "grammar service
    /// unavailable"). Kept as a flag rather than an enum to match the wire
    /// format consumed downstream.
    pub is_error: bool,
    /// Where in the document the violation was found.
    pub location: Location,
}

impl Finding {
    /// Create an error-severity finding.
    #[inline]
    #[must_use = "creates a finding that should be collected"]
    pub fn error(rule: &str, message: impl Into<String>, location: Location) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            is_error: true,
            location,
        }
    }

    /// Create a warning-severity finding (advisory, does not fail validation).
    #[inline]
    #[must_use = "creates a finding that should be collected"]
    pub fn warning(rule: &str, message: impl Into<String>, location: Location) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            is_error: false,
            location,
        }
    }
}

/// The location of a validation issue within a document.
///
/// Paragraph indices are 1-based positions in document order, counting every
/// paragraph including those nested in table cells. Index 0 means the finding
/// is not tied to any particular paragraph (e.g. a document-wide check).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Approximate page number (1-based), derived from the paragraph index.
    pub page: usize,
    /// Approximate line number within the page (1-based).
    pub line: usize,
    /// 1-based paragraph index in document order (0 = not paragraph-scoped).
    pub paragraph: usize,
    /// 1-based run index within the paragraph (0 = not run-scoped).
    pub run: usize,
    /// Character offset from the start of the paragraph text.
    pub character_offset: usize,
    /// Length of the affected text.
    pub length: usize,
    /// Truncated preview of the text at this location.
    pub text: String,
    /// Text of the nearest preceding heading, filled in after rule execution.
    pub section: String,
}

impl Location {
    /// Location scoped to a whole paragraph.
    #[must_use = "creates a location for a finding"]
    pub fn paragraph(index: usize) -> Self {
        let (page, line) = approximate_page_line(index);
        Self {
            page,
            line,
            paragraph: index,
            ..Self::default()
        }
    }

    /// Location scoped to a paragraph, with a text preview attached.
    #[must_use = "creates a location for a finding"]
    pub fn paragraph_text(index: usize, preview: impl Into<String>) -> Self {
        Self {
            text: preview.into(),
            ..Self::paragraph(index)
        }
    }

    /// Location scoped to a run within a paragraph.
    #[must_use = "creates a location for a finding"]
    pub fn run(paragraph: usize, run: usize, character_offset: usize, length: usize) -> Self {
        Self {
            run,
            character_offset,
            length,
            ..Self::paragraph(paragraph)
        }
    }

    /// Human-readable description, e.g. `Page 2, Line 13 (Paragraph 17)`.
    #[must_use = "formats the location for display"]
    pub fn describe(&self) -> String {
        format!(
            "Page {}, Line {} (Paragraph {})",
            self.page, self.line, self.paragraph
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Derive heuristic (page, line) display values from a 1-based paragraph
/// index. Pagination is never computed exactly (that would require full
/// layout); this is a rough guide for the reader of a findings list.
fn approximate_page_line(paragraph: usize) -> (usize, usize) {
    if paragraph == 0 {
        return (0, 0);
    }
    let lines_before = (paragraph - 1) * LINES_PER_PARAGRAPH;
    (lines_before / LINES_PER_PAGE + 1, lines_before % LINES_PER_PAGE + 1)
}

/// One entry of the document's heading outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingInfo {
    /// 1-based heading level.
    pub level: u8,
    /// Heading text, trimmed.
    pub text: String,
}

/// Classification of grammar-service matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrammarIssueKind {
    /// Misspelled word.
    Spelling,
    /// Grammatical error.
    Grammar,
    /// Stylistic advisory.
    Style,
    /// Punctuation issue.
    Punctuation,
    /// Typography issue (spacing, dashes, quotes).
    Typography,
    /// Anything the service reports that fits no other bucket.
    Other,
}

impl GrammarIssueKind {
    /// Classify a grammar-service match from its rule issue type and category
    /// id (both as reported by the service, any case).
    #[must_use = "returns the classified issue kind"]
    pub fn classify(issue_type: &str, category_id: &str) -> Self {
        let issue_type = issue_type.to_lowercase();
        let category_id = category_id.to_lowercase();

        if issue_type == "misspelling" || category_id == "typos" {
            Self::Spelling
        } else if category_id.contains("grammar") || issue_type == "grammar" {
            Self::Grammar
        } else if category_id.contains("style") || issue_type == "style" {
            Self::Style
        } else if category_id.contains("punctuation") {
            Self::Punctuation
        } else if category_id.contains("typography") {
            Self::Typography
        } else {
            Self::Other
        }
    }

    /// Spelling and grammar issues are reported as errors; the rest as
    /// warnings.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Spelling | Self::Grammar)
    }
}

impl std::fmt::Display for GrammarIssueKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spelling => write!(f, "Spelling"),
            Self::Grammar => write!(f, "Grammar"),
            Self::Style => write!(f, "Style"),
            Self::Punctuation => write!(f, "Punctuation"),
            Self::Typography => write!(f, "Typography"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when
/// anything was cut. Safe on multi-byte text.
#[must_use = "returns the truncated preview"]
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
