//! Heading style usage rule: text that is manually formatted to look like a
//! heading (all bold, oversized) should use a real Heading style.

use crate::headings;
use crate::patterns::{self, HEADING_USAGE_EXEMPT_KINDS};
use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument, Paragraph};

/// How many points above the configured body size a font has to be before
/// it reads as a heading.
const SIZE_THRESHOLD_ABOVE_BODY_PT: f64 = 2.0;

/// Headings longer than this are body text, whatever their formatting.
const MAX_HEADING_TEXT_LENGTH: usize = 200;

/// Flags paragraphs whose every text run is bold and at least one run is
/// oversized, but which use no heading style. TOC, header/footer, caption,
/// title, subtitle, list-paragraph and footnote styles are exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingStyleUsageRule;

impl Rule for HeadingStyleUsageRule {
    fn name(&self) -> &'static str {
        "HeadingStyleUsageRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let threshold_pt =
            f64::from(profile.formatting.font.size_pt) + SIZE_THRESHOLD_ABOVE_BODY_PT;
        let resolver = StyleResolver::new(doc);
        let mut findings = Vec::new();

        for paragraph in doc.body.direct_paragraphs() {
            if headings::is_heading(doc, paragraph) {
                continue;
            }
            if paragraph
                .style_id()
                .is_some_and(|id| patterns::matches_any(id, HEADING_USAGE_EXEMPT_KINDS))
            {
                continue;
            }

            let text = paragraph.text().trim().to_string();
            if text.is_empty() || text.chars().count() > MAX_HEADING_TEXT_LENGTH {
                continue;
            }

            if !looks_like_manual_heading(&resolver, paragraph, threshold_pt) {
                continue;
            }

            let message = "Paragraph appears manually formatted as a heading. Apply a \
                           proper Heading style (Heading 1, Heading 2, etc.) instead of \
                           manual bold/font-size formatting.";
            findings.push(Finding::error(
                self.name(),
                message,
                Location::paragraph_text(paragraph.index, truncate_preview(&text, 60)),
            ));
            if let Some(sink) = sink {
                sink.comment_on_paragraph(paragraph, message);
            }
        }

        findings
    }
}

/// All text-bearing runs bold, and at least one of them at or above the
/// size threshold.
fn looks_like_manual_heading(
    resolver: &StyleResolver,
    paragraph: &Paragraph,
    threshold_pt: f64,
) -> bool {
    let runs: Vec<_> = paragraph
        .runs
        .iter()
        .filter(|run| !run.text().trim().is_empty())
        .collect();
    if runs.is_empty() {
        return false;
    }

    let mut has_large_font = false;
    for &run in &runs {
        if !resolver.bold(paragraph, Some(run)) {
            return false;
        }
        if resolver
            .font_size_pt(paragraph, Some(run))
            .is_some_and(|pt| pt >= threshold_pt)
        {
            has_large_font = true;
        }
    }
    has_large_font
}
