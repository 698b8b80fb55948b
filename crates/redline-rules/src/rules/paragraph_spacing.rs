//! Paragraph spacing rule: the effective "spacing after" of every paragraph
//! must be one of the configured allowed values.

use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile, TWIPS_PER_PT};
use redline_docx::{CommentSink, DocxDocument};

/// Checks the effective after-spacing against the profile's allowed set
/// (configured in points, compared in twips). An "auto" spacing value
/// resolves to the sentinel -1 and therefore never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphSpacingRule;

impl Rule for ParagraphSpacingRule {
    fn name(&self) -> &'static str {
        "ParagraphSpacingRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let allowed_twips: Vec<i32> = profile
            .formatting
            .layout
            .allowed_spacing_after_pt
            .iter()
            .map(|pt| pt * TWIPS_PER_PT)
            .collect();
        let allowed_list = allowed_twips
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");

        let resolver = StyleResolver::new(doc);
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let after = resolver.spacing_after_for_check(paragraph);
            if allowed_twips.contains(&after) {
                continue;
            }

            let message = format!(
                "Paragraph has incorrect spacing or set to auto. After value: {after} twips. \
                 Expected {allowed_list} twips."
            );
            findings.push(Finding::error(
                self.name(),
                &message,
                Location::paragraph_text(paragraph.index, truncate_preview(&paragraph.text(), 50)),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, &message);
            }
        }

        findings
    }
}
