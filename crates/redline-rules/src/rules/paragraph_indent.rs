//! Paragraph indent rule: body paragraphs use a proper first-line indent of
//! 1.00 cm or 1.25 cm, not a tab character.

use crate::patterns::{self, INDENT_EXEMPT_KINDS};
use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile, TWIPS_PER_CM};
use redline_docx::{CommentSink, DocxDocument, Justification, Paragraph};

/// Allowed first-line indents: 1 cm (~567 twips) and 1.25 cm (~709 twips).
/// Word stores these as 567, 568, 708, 709 or 720 depending on rounding, so
/// membership uses a tolerance.
const ALLOWED_INDENTS_TWIPS: [i32; 2] = [567, 709];

/// About 0.1 cm, covering metric/imperial rounding differences.
const TOLERANCE_TWIPS: i32 = 60;

/// Checks that every body paragraph has a correct first-line indent and
/// flags tab characters used as fake indents as a distinct violation.
///
/// Skipped: blank paragraphs, heading/title/TOC/caption/figure/table/
/// bibliography/list styles, centered or right-aligned paragraphs, and list
/// items without an explicit indent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphIndentRule;

impl Rule for ParagraphIndentRule {
    fn name(&self) -> &'static str {
        "RequiredIndentCm"
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
            if !paragraph.has_text() {
                continue;
            }
            if is_exempt_style(doc, paragraph) {
                continue;
            }
            match resolver.justification(paragraph) {
                Justification::Center | Justification::Right => continue,
                _ => {}
            }

            let first_line = resolver.first_line_indent_twips(paragraph);

            if first_line == 0 && paragraph.is_list_item() {
                continue;
            }

            if paragraph.starts_with_tab() && first_line == 0 {
                let message = "Paragraph uses TAB character for indent instead of proper \
                               first-line indent formatting. Please use paragraph formatting \
                               (1.00 cm or 1.25 cm first-line indent) instead of TAB.";
                findings.push(Finding::error(
                    self.name(),
                    message,
                    Location::paragraph_text(
                        paragraph.index,
                        truncate_preview(&paragraph.text(), 50),
                    ),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(paragraph, message);
                }
                continue;
            }

            if !is_allowed_indent(first_line) {
                let actual_cm = f64::from(first_line) / TWIPS_PER_CM;
                let message = format!(
                    "Paragraph has incorrect first line indent: {actual_cm:.2} cm. \
                     Expected 1.00 cm or 1.25 cm."
                );
                findings.push(Finding::error(
                    self.name(),
                    &message,
                    Location::paragraph_text(
                        paragraph.index,
                        truncate_preview(&paragraph.text(), 50),
                    ),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(paragraph, &message);
                }
            }
        }

        findings
    }
}

fn is_allowed_indent(twips: i32) -> bool {
    ALLOWED_INDENTS_TWIPS
        .iter()
        .any(|allowed| (twips - allowed).abs() <= TOLERANCE_TWIPS)
}

/// Whether the paragraph's style exempts it from the indent requirement,
/// judged by the style's display name (falling back to its id) and by an
/// outline level that marks it a heading.
fn is_exempt_style(doc: &DocxDocument, paragraph: &Paragraph) -> bool {
    let Some(style_id) = paragraph.style_id() else {
        return false;
    };
    let Some(style) = doc.styles.get(style_id) else {
        return false;
    };

    let label = style.name.as_deref().unwrap_or(style_id);
    if patterns::matches_any(label, INDENT_EXEMPT_KINDS) {
        return true;
    }

    style.outline_level.is_some_and(|level| level <= 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{
        Block, Body, Indentation, Paragraph, ParagraphProperties, Numbering, Run, RunContent,
        RunProperties, Style,
    };

    fn text_paragraph(index: usize, text: &str) -> Paragraph {
        Paragraph {
            index,
            runs: vec![Run {
                properties: RunProperties::default(),
                content: vec![RunContent::Text(text.to_string())],
            }],
            ..Paragraph::default()
        }
    }

    fn doc_of(paragraphs: Vec<Paragraph>) -> DocxDocument {
        DocxDocument {
            body: Body {
                blocks: paragraphs.into_iter().map(Block::Paragraph).collect(),
            },
            ..DocxDocument::default()
        }
    }

    fn with_first_line(mut para: Paragraph, twips: i32) -> Paragraph {
        para.properties.format.indentation = Some(Indentation {
            first_line: Some(twips),
            ..Indentation::default()
        });
        para
    }

    #[test]
    fn test_correct_indents_pass() {
        let doc = doc_of(vec![
            with_first_line(text_paragraph(1, "One centimeter."), 567),
            with_first_line(text_paragraph(2, "Word's 1.25 cm."), 709),
            with_first_line(text_paragraph(3, "Rounded 1.25 cm."), 720),
        ]);
        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_missing_indent_flagged() {
        let doc = doc_of(vec![text_paragraph(1, "No indent at all.")]);
        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("0.00 cm"));
    }

    #[test]
    fn test_wrong_indent_reports_centimeters() {
        let doc = doc_of(vec![with_first_line(text_paragraph(1, "Two cm."), 1134)]);
        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("2.00 cm"));
    }

    #[test]
    fn test_tab_as_indent_is_distinct_violation() {
        let mut para = text_paragraph(1, "Tabbed text");
        para.runs[0].content.insert(0, RunContent::Tab);
        let doc = doc_of(vec![para]);

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("TAB character"));
    }

    #[test]
    fn test_tab_with_proper_indent_not_the_tab_violation() {
        let mut para = with_first_line(text_paragraph(1, "Tabbed but indented"), 709);
        para.runs[0].content.insert(0, RunContent::Tab);
        let doc = doc_of(vec![para]);

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_blank_paragraphs_skipped() {
        let doc = doc_of(vec![text_paragraph(1, "   ")]);
        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_centered_paragraphs_skipped() {
        let mut para = text_paragraph(1, "A centered motto");
        para.properties.format.justification = Some(Justification::Center);
        let doc = doc_of(vec![para]);

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_list_items_without_indent_skipped() {
        let mut para = text_paragraph(1, "list item");
        para.properties.numbering = Some(Numbering {
            num_id: Some(1),
            level: Some(0),
        });
        let doc = doc_of(vec![para]);

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_heading_styles_exempt_by_name_and_outline() {
        let mut doc = doc_of(vec![
            Paragraph {
                properties: ParagraphProperties {
                    style_id: Some("H1".to_string()),
                    ..ParagraphProperties::default()
                },
                ..text_paragraph(1, "Chapter title")
            },
            Paragraph {
                properties: ParagraphProperties {
                    style_id: Some("Custom".to_string()),
                    ..ParagraphProperties::default()
                },
                ..text_paragraph(2, "Custom outline heading")
            },
        ]);
        doc.styles.push(Style {
            id: "H1".to_string(),
            name: Some("heading 1".to_string()),
            ..Style::default()
        });
        doc.styles.push(Style {
            id: "Custom".to_string(),
            name: Some("My Chapter".to_string()),
            outline_level: Some(0),
            ..Style::default()
        });

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_indent_from_style_chain_accepted() {
        let mut doc = doc_of(vec![Paragraph {
            properties: ParagraphProperties {
                style_id: Some("Body".to_string()),
                ..ParagraphProperties::default()
            },
            ..text_paragraph(1, "Styled body text")
        }]);
        doc.styles.push(Style {
            id: "Body".to_string(),
            name: Some("Body Text First Indent".to_string()),
            format: redline_docx::BlockFormat {
                indentation: Some(Indentation {
                    first_line: Some(567),
                    ..Indentation::default()
                }),
                ..redline_docx::BlockFormat::default()
            },
            ..Style::default()
        });

        let findings =
            ParagraphIndentRule.validate(&doc, &ValidationProfile::default(), None);
        assert!(findings.is_empty());
    }
}
