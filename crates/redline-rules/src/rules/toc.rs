//! Table-of-contents rule: the document must contain a TOC field.

use crate::rule::Rule;
use redline_core::{Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};

/// Checks that a TOC field code exists anywhere in the body. Word inserts
/// the table of contents as a field whose instruction text starts with
/// `TOC`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOfContentsRule;

impl Rule for TableOfContentsRule {
    fn name(&self) -> &'static str {
        "CheckTableOfContents"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let toc_exists = doc
            .paragraphs()
            .flat_map(|p| p.field_codes.iter())
            .any(|instr| instr.trim().starts_with("TOC"));
        if toc_exists {
            return Vec::new();
        }

        let message = "Document is missing a Table of Contents.";
        if let Some(sink) = sink {
            // Anchor at the very first run in the document, if there is one.
            if let Some(paragraph) = doc.paragraphs().find(|p| !p.runs.is_empty()) {
                sink.comment_on_run(paragraph, 0, message);
            }
        }

        vec![Finding::error(self.name(), message, Location::default())]
    }
}
