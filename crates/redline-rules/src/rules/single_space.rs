//! Single-space rule: only single spaces between words.

use crate::rule::Rule;
use once_cell::sync::Lazy;
use redline_core::{Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};
use regex::Regex;

/// Characters of context shown on each side of a run of spaces.
const CONTEXT_CHARS: usize = 15;

static MULTIPLE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new("  +").expect("valid regex"));

/// Flags every occurrence of two or more consecutive spaces, with a context
/// snippet and the exact character offset and length.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSpaceRule;

impl Rule for SingleSpaceRule {
    fn name(&self) -> &'static str {
        "SingleSpaceRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let text = paragraph.text();
            if text.trim().is_empty() {
                continue;
            }

            for m in MULTIPLE_SPACES.find_iter(&text) {
                // Regex offsets are bytes; findings report characters.
                let offset = text[..m.start()].chars().count();
                let length = m.as_str().len();

                let snippet = context_snippet(&text, offset, length);
                let message = format!(
                    "Multiple spaces found ({length} spaces). Only single spaces allowed \
                     between words. Context: \"{snippet}\""
                );

                let mut location = Location::paragraph(paragraph.index);
                location.character_offset = offset;
                location.length = length;
                location.text = snippet;
                findings.push(Finding::error(self.name(), &message, location));

                if let Some(sink) = sink {
                    sink.comment_on_paragraph(paragraph, &message);
                }
            }
        }

        findings
    }
}

/// Build a `...before[N spaces]after...` snippet around a match, `offset`
/// and `length` counted in characters.
fn context_snippet(text: &str, offset: usize, length: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = offset.saturating_sub(CONTEXT_CHARS);
    let end = (offset + length + CONTEXT_CHARS).min(chars.len());

    let before: String = chars[start..offset].iter().collect();
    let after: String = chars[offset + length..end].iter().collect();

    let prefix = if start > 0 { "..." } else { "" };
    let suffix = if end < chars.len() { "..." } else { "" };

    format!("{prefix}{before}[{length} spaces]{after}{suffix}")
}
