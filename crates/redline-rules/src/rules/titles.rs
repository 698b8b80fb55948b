//! No-dots-in-titles rule: headings, titles, subtitles and captions must not
//! end with a single period. An ellipsis (two or more dots) is allowed, as
//! is any other punctuation.

use crate::patterns::{self, TITLE_LIKE_KINDS};
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};

/// See module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDotsInTitlesRule;

impl Rule for NoDotsInTitlesRule {
    fn name(&self) -> &'static str {
        "NoDotsInTitlesRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let Some(style_id) = paragraph.style_id() else {
                continue;
            };
            if !patterns::matches_any(style_id, TITLE_LIKE_KINDS) {
                continue;
            }

            let text = paragraph.text();
            if text.trim().is_empty() {
                continue;
            }

            let trimmed = text.trim_end();
            if !ends_with_single_period(trimmed) {
                continue;
            }

            let preview = truncate_preview(trimmed, 60);
            let message = format!(
                "Title/Heading should not end with a period. Style: {style_id}. \
                 Text: \"{preview}\""
            );
            findings.push(Finding::error(
                self.name(),
                &message,
                Location::paragraph_text(paragraph.index, preview.clone()),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, &message);
            }
        }

        findings
    }
}

/// True when the text ends with exactly one period (not an ellipsis).
fn ends_with_single_period(text: &str) -> bool {
    text.ends_with('.') && !text.ends_with("..")
}
