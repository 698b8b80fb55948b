//! Line-spacing dependency rule: paragraphs set to 1.5 line spacing must
//! have zero spacing before and after.

use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{Finding, Location, ValidationProfile, TWIPS_PER_PT};
use redline_docx::{CommentSink, DocxDocument};

/// If the effective line spacing is 1.5 lines (value 360 under the auto
/// rule), the effective before/after spacing must both be 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSpacingDependencyRule;

impl Rule for LineSpacingDependencyRule {
    fn name(&self) -> &'static str {
        "LineSpacingDependencyRule"
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
            if !resolver.has_one_and_half_line_spacing(paragraph) {
                continue;
            }

            let before = resolver.spacing_before_twips(paragraph);
            let after = resolver.spacing_after_twips(paragraph);
            if before == 0 && after == 0 {
                continue;
            }

            let before_pt = f64::from(before) / f64::from(TWIPS_PER_PT);
            let after_pt = f64::from(after) / f64::from(TWIPS_PER_PT);
            let message = format!(
                "Paragraph with 1.5 line spacing must have 0pt spacing before and after. \
                 Found: Before={before_pt:.1}pt, After={after_pt:.1}pt."
            );
            findings.push(Finding::error(
                self.name(),
                &message,
                Location::paragraph(paragraph.index),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, &message);
            }
        }

        findings
    }
}
