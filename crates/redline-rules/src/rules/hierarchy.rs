//! Hierarchy depth rule: the document structure must not go deeper than
//! three heading levels.

use crate::headings;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};

/// Deepest allowed heading level.
const MAX_ALLOWED_LEVEL: u8 = 3;

/// Flags any heading at level 4 or deeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyDepthRule;

impl Rule for HierarchyDepthRule {
    fn name(&self) -> &'static str {
        "HierarchyDepthRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let Some(level) = headings::heading_level(doc, paragraph) else {
                continue;
            };
            if level <= MAX_ALLOWED_LEVEL {
                continue;
            }

            let message = format!(
                "Structure too deep. Detected Level {level}, but maximum allowed is \
                 {MAX_ALLOWED_LEVEL}."
            );
            findings.push(Finding::error(
                self.name(),
                &message,
                Location::paragraph_text(
                    paragraph.index,
                    truncate_preview(&paragraph.text(), 60),
                ),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, &message);
            }
        }

        findings
    }
}
