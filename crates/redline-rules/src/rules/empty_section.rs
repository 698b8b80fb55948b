//! Empty section structure rule: a sub-heading must not immediately follow
//! its parent heading with no body text in between.

use crate::headings;
use crate::rule::Rule;
use redline_core::{truncate_preview, Finding, Location, ValidationProfile};
use redline_docx::{Block, CommentSink, DocxDocument, Paragraph};

/// Tracks the last heading seen while walking the body; any non-empty
/// paragraph or table between headings counts as body content. A heading
/// followed directly by a deeper heading yields a finding on the parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySectionStructureRule;

impl Rule for EmptySectionStructureRule {
    fn name(&self) -> &'static str {
        "EmptySectionStructureRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        let mut last_heading: Option<(&Paragraph, u8, String)> = None;
        let mut has_body_content = false;

        for block in &doc.body.blocks {
            let paragraph = match block {
                Block::Table(_) => {
                    // A table is body content for the open section.
                    if last_heading.is_some() {
                        has_body_content = true;
                    }
                    continue;
                }
                Block::Paragraph(p) => p,
            };

            let Some(level) = headings::heading_level(doc, paragraph) else {
                if !has_body_content && paragraph.has_text() {
                    has_body_content = true;
                }
                continue;
            };

            if let Some((last_para, last_level, last_preview)) = &last_heading {
                if level > *last_level && !has_body_content {
                    let current_preview =
                        truncate_preview(paragraph.text().trim(), 50);
                    let message = format!(
                        "Heading {} \"{}\" is immediately followed by Heading {} \"{}\" \
                         with no introductory text. Add at least one paragraph of body \
                         text before the first sub-section.",
                        last_level, last_preview, level, current_preview
                    );
                    findings.push(Finding::error(
                        self.name(),
                        &message,
                        Location::paragraph_text(last_para.index, last_preview.clone()),
                    ));
                    if let Some(sink) = sink {
                        sink.comment_on_paragraph(last_para, &message);
                    }
                }
            }

            last_heading = Some((
                paragraph,
                level,
                truncate_preview(paragraph.text().trim(), 60),
            ));
            has_body_content = false;
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{
        Body, Paragraph, ParagraphProperties, Run, RunContent, RunProperties, Table,
    };

    fn paragraph(index: usize, style: Option<&str>, text: &str) -> Paragraph {
        Paragraph {
            index,
            properties: ParagraphProperties {
                style_id: style.map(str::to_string),
                ..ParagraphProperties::default()
            },
            runs: vec![Run {
                properties: RunProperties::default(),
                content: vec![RunContent::Text(text.to_string())],
            }],
            ..Paragraph::default()
        }
    }

    fn doc_of(blocks: Vec<Block>) -> DocxDocument {
        DocxDocument {
            body: Body { blocks },
            ..DocxDocument::default()
        }
    }

    fn run_rule(doc: &DocxDocument) -> Vec<Finding> {
        EmptySectionStructureRule.validate(doc, &ValidationProfile::default(), None)
    }

    #[test]
    fn test_heading_directly_followed_by_subheading_flagged() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
            Block::Paragraph(paragraph(2, Some("Heading2"), "Section 1.1")),
        ]);
        let findings = run_rule(&doc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("Chapter 1"));
        assert!(findings[0].message.contains("Section 1.1"));
        assert_eq!(findings[0].location.paragraph, 1);
    }

    #[test]
    fn test_intro_text_between_headings_passes() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
            Block::Paragraph(paragraph(2, None, "A short introduction.")),
            Block::Paragraph(paragraph(3, Some("Heading2"), "Section 1.1")),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_blank_paragraph_is_not_body_content() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
            Block::Paragraph(paragraph(2, None, "   ")),
            Block::Paragraph(paragraph(3, Some("Heading2"), "Section 1.1")),
        ]);
        assert_eq!(run_rule(&doc).len(), 1);
    }

    #[test]
    fn test_table_counts_as_body_content() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
            Block::Table(Table {
                paragraphs: vec![paragraph(2, None, "cell")],
            }),
            Block::Paragraph(paragraph(3, Some("Heading2"), "Section 1.1")),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_same_level_headings_allowed_back_to_back() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading2"), "Section 1.1")),
            Block::Paragraph(paragraph(2, Some("Heading2"), "Section 1.2")),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_returning_to_shallower_level_allowed() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading2"), "Section 1.2")),
            Block::Paragraph(paragraph(2, Some("Heading1"), "Chapter 2")),
        ]);
        assert!(run_rule(&doc).is_empty());
    }

    #[test]
    fn test_multiple_empty_sections_each_flagged() {
        let doc = doc_of(vec![
            Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
            Block::Paragraph(paragraph(2, Some("Heading2"), "Section 1.1")),
            Block::Paragraph(paragraph(3, None, "Some body text.")),
            Block::Paragraph(paragraph(4, Some("Heading1"), "Chapter 2")),
            Block::Paragraph(paragraph(5, Some("Heading2"), "Section 2.1")),
        ]);
        assert_eq!(run_rule(&doc).len(), 2);
    }
}
