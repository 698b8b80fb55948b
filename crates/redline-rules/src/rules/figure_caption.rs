//! Figure caption rule: every image paragraph must be followed by a proper
//! caption paragraph.
//!
//! Four independent checks on the caption: a dedicated (non-Normal) style,
//! 11pt font, centered alignment, and no indentation.

use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, twips_to_cm, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument, Justification, Paragraph};

/// Required caption font size.
const EXPECTED_FONT_SIZE_PT: f64 = 11.0;

/// Indentation within this many twips of zero still counts as none.
const INDENT_TOLERANCE_TWIPS: i32 = 10;

/// See module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FigureCaptionStyleRule;

impl Rule for FigureCaptionStyleRule {
    fn name(&self) -> &'static str {
        "FigureCaptionStyleRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let resolver = StyleResolver::new(doc);
        let paragraphs: Vec<&Paragraph> = doc.body.direct_paragraphs().collect();
        let mut findings = Vec::new();

        for (i, figure) in paragraphs.iter().enumerate() {
            if !figure.contains_image() {
                continue;
            }

            let caption = paragraphs.get(i + 1).copied();
            let caption_text = caption.map(|c| c.text().trim().to_string());
            let Some((caption, caption_text)) =
                caption.zip(caption_text.filter(|t| !t.is_empty()))
            else {
                let message = "Figure has no caption. Add a caption paragraph with text \
                               immediately after the image.";
                findings.push(Finding::error(
                    self.name(),
                    message,
                    Location::paragraph_text(figure.index, "[Image]"),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(figure, message);
                }
                continue;
            };

            let preview = truncate_preview(&caption_text, 50);
            let style_id = caption.style_id();

            // Style must be a dedicated caption style, not Normal/absent.
            if style_id.is_none() || style_id.is_some_and(is_normal_style) {
                let label = style_id.unwrap_or("Normal");
                let message = format!(
                    "Figure caption uses \"{label}\" style. Assign a Caption style \
                     (e.g., \"Caption\", \"Legenda\")."
                );
                findings.push(Finding::error(
                    self.name(),
                    &message,
                    Location::paragraph_text(caption.index, preview.clone()),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(caption, &message);
                }
            }

            self.check_font_size(&resolver, caption, &preview, &mut findings);
            self.check_alignment(&resolver, caption, &preview, &mut findings);
            self.check_indentation(&resolver, caption, &preview, &mut findings);
        }

        findings
    }
}

fn is_normal_style(style_id: &str) -> bool {
    style_id.eq_ignore_ascii_case("Normal") || style_id.eq_ignore_ascii_case("Normalny")
}

impl FigureCaptionStyleRule {
    fn check_font_size(
        &self,
        resolver: &StyleResolver,
        caption: &Paragraph,
        preview: &str,
        findings: &mut Vec<Finding>,
    ) {
        // Prefer the first text-bearing run with an explicit size; fall back
        // to the style chain.
        let explicit = caption
            .runs
            .iter()
            .find(|run| !run.text().trim().is_empty())
            .and_then(|run| run.properties.size_pt());
        let Some(pt) = explicit.or_else(|| resolver.font_size_pt(caption, None)) else {
            return;
        };

        if (pt - EXPECTED_FONT_SIZE_PT).abs() > 0.01 {
            findings.push(Finding::error(
                self.name(),
                format!(
                    "Figure caption font size must be 11pt, found {}pt.",
                    format_points(pt)
                ),
                Location::paragraph_text(caption.index, preview),
            ));
        }
    }

    fn check_alignment(
        &self,
        resolver: &StyleResolver,
        caption: &Paragraph,
        preview: &str,
        findings: &mut Vec<Finding>,
    ) {
        let justification = resolver.justification(caption);
        if justification == Justification::Center {
            return;
        }

        let name = match justification {
            Justification::Right => "right-aligned",
            Justification::Both | Justification::Distribute => "justified",
            _ => "left-aligned",
        };
        findings.push(Finding::error(
            self.name(),
            format!("Figure caption must be centered, found {name}."),
            Location::paragraph_text(caption.index, preview),
        ));
    }

    fn check_indentation(
        &self,
        resolver: &StyleResolver,
        caption: &Paragraph,
        preview: &str,
        findings: &mut Vec<Finding>,
    ) {
        let left = resolver.left_indent_twips(caption);
        let first_line = resolver.first_line_indent_twips(caption);
        if left.abs() <= INDENT_TOLERANCE_TWIPS && first_line.abs() <= INDENT_TOLERANCE_TWIPS {
            return;
        }

        findings.push(Finding::error(
            self.name(),
            format!(
                "Figure caption must have no indentation (left: {:.2}cm, first-line: {:.2}cm).",
                twips_to_cm(left),
                twips_to_cm(first_line)
            ),
            Location::paragraph_text(caption.index, preview),
        ));
    }
}

/// Display a point size without trailing zeros ("11", "11.5").
fn format_points(pt: f64) -> String {
    let mut formatted = format!("{pt:.2}");
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{
        Block, Body, Indentation, Paragraph, ParagraphProperties, Run, RunContent,
        RunProperties,
    };

    fn image_paragraph(index: usize) -> Paragraph {
        Paragraph {
            index,
            runs: vec![Run {
                properties: RunProperties::default(),
                content: vec![RunContent::Drawing],
            }],
            ..Paragraph::default()
        }
    }

    fn caption_paragraph(index: usize, style: Option<&str>, text: &str) -> Paragraph {
        let mut para = Paragraph {
            index,
            properties: ParagraphProperties {
                style_id: style.map(str::to_string),
                ..ParagraphProperties::default()
            },
            runs: vec![Run {
                properties: RunProperties {
                    size_half_pt: Some(22),
                    ..RunProperties::default()
                },
                content: vec![RunContent::Text(text.to_string())],
            }],
            ..Paragraph::default()
        };
        para.properties.format.justification = Some(Justification::Center);
        para
    }

    fn doc_of(paragraphs: Vec<Paragraph>) -> DocxDocument {
        DocxDocument {
            body: Body {
                blocks: paragraphs.into_iter().map(Block::Paragraph).collect(),
            },
            ..DocxDocument::default()
        }
    }

    fn run_rule(doc: &DocxDocument) -> Vec<Finding> {
        FigureCaptionStyleRule.validate(doc, &ValidationProfile::default(), None)
    }

    #[test]
    fn test_proper_caption_passes() {
        let doc = doc_of(vec![
            image_paragraph(1),
            caption_paragraph(2, Some("Caption"), "Figure 1: Overview"),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_missing_caption_flagged() {
        let doc = doc_of(vec![image_paragraph(1)]);
        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("no caption"));
        assert_eq!(findings[0].location.text, "[Image]");
    }

    #[test]
    fn test_blank_following_paragraph_counts_as_missing() {
        let doc = doc_of(vec![
            image_paragraph(1),
            caption_paragraph(2, Some("Caption"), "   "),
        ]);
        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("no caption"));
    }

    #[test]
    fn test_normal_style_caption_flagged() {
        let doc = doc_of(vec![
            image_paragraph(1),
            caption_paragraph(2, Some("Normal"), "Figure 1"),
        ]);
        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("\"Normal\" style"));
    }

    #[test]
    fn test_absent_style_reported_as_normal() {
        let doc = doc_of(vec![
            image_paragraph(1),
            caption_paragraph(2, None, "Figure 1"),
        ]);
        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("\"Normal\" style"));
    }

    #[test]
    fn test_wrong_font_size_flagged() {
        let mut caption = caption_paragraph(2, Some("Caption"), "Figure 1");
        caption.runs[0].properties.size_half_pt = Some(24); // 12pt
        let doc = doc_of(vec![image_paragraph(1), caption]);

        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("must be 11pt, found 12pt"));
    }

    #[test]
    fn test_uncentered_caption_flagged() {
        let mut caption = caption_paragraph(2, Some("Caption"), "Figure 1");
        caption.properties.format.justification = None;
        let doc = doc_of(vec![image_paragraph(1), caption]);

        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("found left-aligned"));
    }

    #[test]
    fn test_indented_caption_flagged() {
        let mut caption = caption_paragraph(2, Some("Caption"), "Figure 1");
        caption.properties.format.indentation = Some(Indentation {
            left: Some(567),
            ..Indentation::default()
        });
        let doc = doc_of(vec![image_paragraph(1), caption]);

        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("no indentation"));
        assert!(findings[0].message.contains("left: 1.00cm"));
    }

    #[test]
    fn test_each_subcheck_reports_independently() {
        // Normal style + wrong size + left aligned + indented: four findings.
        let mut caption = caption_paragraph(2, Some("Normal"), "Figure 1");
        caption.runs[0].properties.size_half_pt = Some(20);
        caption.properties.format.justification = None;
        caption.properties.format.indentation = Some(Indentation {
            first_line: Some(709),
            ..Indentation::default()
        });
        let doc = doc_of(vec![image_paragraph(1), caption]);

        assert_eq!(run_rule(&doc).len(), 4);
    }

    #[test]
    fn test_non_image_paragraphs_ignored() {
        let doc = doc_of(vec![
            caption_paragraph(1, None, "Just text"),
            caption_paragraph(2, None, "More text"),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(11.0), "11");
        assert_eq!(format_points(11.5), "11.5");
        assert_eq!(format_points(10.25), "10.25");
    }
}
