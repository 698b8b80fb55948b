//! Font family rule: every non-blank run must use the configured body font.

use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};

/// Checks the effective font of every text-bearing run against the expected
/// font family, case-insensitively. Each offending run yields its own
/// finding with run index and character offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontFamilyRule;

impl Rule for FontFamilyRule {
    fn name(&self) -> &'static str {
        "FontFamily"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let expected = &profile.formatting.font.family;
        let resolver = StyleResolver::new(doc);
        let mut findings = Vec::new();

        for paragraph in doc.paragraphs() {
            let mut character_offset = 0usize;

            for (run_idx, run) in paragraph.runs.iter().enumerate() {
                let text = run.text();
                let text_len = text.chars().count();

                if !text.trim().is_empty() {
                    let actual = resolver.font(paragraph, Some(run));
                    let matches = actual
                        .as_deref()
                        .is_some_and(|font| font.eq_ignore_ascii_case(expected));

                    if !matches {
                        let message = format!(
                            "Invalid font '{}' found, expected '{}'",
                            actual.as_deref().unwrap_or("unknown"),
                            expected
                        );

                        if let Some(sink) = sink {
                            sink.comment_on_run(paragraph, run_idx, &message);
                        }

                        let mut location =
                            Location::run(paragraph.index, run_idx + 1, character_offset, text_len);
                        location.text = truncate_preview(&text, 50);
                        findings.push(Finding::error(self.name(), message, location));
                    }
                }

                character_offset += text_len;
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{
        Block, Body, Paragraph, Run, RunContent, RunProperties,
    };

    fn run(font: Option<&str>, text: &str) -> Run {
        Run {
            properties: RunProperties {
                font: font.map(str::to_string),
                ..RunProperties::default()
            },
            content: vec![RunContent::Text(text.to_string())],
        }
    }

    fn doc_with_runs(runs_per_paragraph: Vec<Vec<Run>>) -> DocxDocument {
        let blocks = runs_per_paragraph
            .into_iter()
            .enumerate()
            .map(|(i, runs)| {
                Block::Paragraph(Paragraph {
                    index: i + 1,
                    runs,
                    ..Paragraph::default()
                })
            })
            .collect();
        DocxDocument {
            body: Body { blocks },
            ..DocxDocument::default()
        }
    }

    #[test]
    fn test_wrong_font_flagged_with_location() {
        let doc = doc_with_runs(vec![
            vec![run(Some("Times New Roman"), "Fine paragraph.")],
            vec![run(Some("Arial"), "Wrong font here.")],
        ]);

        let findings =
            FontFamilyRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert!(finding.is_error);
        assert!(finding.message.contains("Arial"));
        assert!(finding.message.contains("Times New Roman"));
        assert_eq!(finding.location.paragraph, 2);
        assert_eq!(finding.location.run, 1);
        assert_eq!(finding.location.character_offset, 0);
    }

    #[test]
    fn test_font_compare_is_case_insensitive() {
        let doc = doc_with_runs(vec![vec![run(Some("times new roman"), "ok")]]);
        let findings =
            FontFamilyRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_blank_runs_skipped() {
        let doc = doc_with_runs(vec![vec![run(Some("Arial"), "   ")]]);
        let findings =
            FontFamilyRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_character_offset_accumulates_across_runs() {
        let doc = doc_with_runs(vec![vec![
            run(Some("Times New Roman"), "Good start. "),
            run(Some("Courier New"), "bad tail"),
        ]]);

        let findings =
            FontFamilyRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.run, 2);
        assert_eq!(findings[0].location.character_offset, 12);
        assert_eq!(findings[0].location.length, 8);
    }

    #[test]
    fn test_unresolvable_font_reports_unknown() {
        let doc = doc_with_runs(vec![vec![run(None, "mystery font")]]);
        let findings =
            FontFamilyRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'unknown'"));
    }

    #[test]
    fn test_idempotent() {
        let doc = doc_with_runs(vec![vec![run(Some("Arial"), "text")]]);
        let profile = ValidationProfile::default();
        let first = FontFamilyRule.validate(&doc, &profile, None);
        let second = FontFamilyRule.validate(&doc, &profile, None);
        assert_eq!(first, second);
    }
}
