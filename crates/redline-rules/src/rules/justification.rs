//! Text justification rule: standard body text must be fully justified.

use crate::patterns::{self, JUSTIFICATION_EXEMPT_KINDS};
use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument, Justification};

/// Checks that every standard text paragraph uses full justification (both
/// margins). List items and heading/title/subtitle/caption/TOC/quote/
/// header/footer/list styles are exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextJustificationRule;

impl Rule for TextJustificationRule {
    fn name(&self) -> &'static str {
        "TextJustificationRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let resolver = StyleResolver::new(doc);
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let text = paragraph.text();
            if text.trim().is_empty() {
                continue;
            }
            if paragraph.is_list_item() {
                continue;
            }
            if paragraph
                .style_id()
                .is_some_and(|id| patterns::matches_any(id, JUSTIFICATION_EXEMPT_KINDS))
            {
                continue;
            }

            let justification = resolver.justification(paragraph);
            if justification == Justification::Both {
                continue;
            }

            let message = format!(
                "Paragraph is {} aligned. Standard text must use full justification \
                 (both margins).",
                justification.describe()
            );
            findings.push(Finding::error(
                self.name(),
                &message,
                Location::paragraph_text(paragraph.index, truncate_preview(&text, 50)),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, &message);
            }
        }

        findings
    }
}
