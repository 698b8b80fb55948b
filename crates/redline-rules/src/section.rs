//! Section context: attaching the nearest preceding heading to findings.
//!
//! All rules report the same global paragraph indices (assigned at parse
//! time, table-cell paragraphs included), so one ordered heading map serves
//! every finding. For each finding the nearest heading whose index is ≤ the
//! finding's paragraph index wins; headings with blank text are excluded;
//! findings without a paragraph (index 0) stay without a section.

use crate::headings;
use redline_core::Finding;
use redline_docx::DocxDocument;

/// Ordered map from paragraph index to heading text.
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    /// `(paragraph index, heading text)`, ascending by index.
    headings: Vec<(usize, String)>,
}

impl SectionIndex {
    /// Build the index from a document.
    #[must_use]
    pub fn build(doc: &DocxDocument) -> Self {
        let headings = doc
            .paragraphs()
            .filter(|p| headings::is_heading(doc, p))
            .filter_map(|p| {
                let text = p.text().trim().to_string();
                (!text.is_empty()).then_some((p.index, text))
            })
            .collect();
        Self { headings }
    }

    /// The heading text governing the given paragraph index, if any.
    #[must_use]
    pub fn section_for(&self, paragraph: usize) -> Option<&str> {
        if paragraph == 0 {
            return None;
        }
        self.headings
            .iter()
            .take_while(|(index, _)| *index <= paragraph)
            .last()
            .map(|(_, text)| text.as_str())
    }

    /// Fill in the `section` field of every finding that has one.
    pub fn annotate(&self, findings: &mut [Finding]) {
        for finding in findings {
            if let Some(section) = self.section_for(finding.location.paragraph) {
                finding.location.section = section.to_string();
            }
        }
    }

    /// Number of headings in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Whether the document has no usable headings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::Location;
    use redline_docx::{
        Block, Body, Paragraph, ParagraphProperties, Run, RunContent, RunProperties,
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

    fn doc_with_headings() -> DocxDocument {
        DocxDocument {
            body: Body {
                blocks: vec![
                    Block::Paragraph(paragraph(1, Some("Heading1"), "Chapter 1")),
                    Block::Paragraph(paragraph(2, None, "body text 1")),
                    Block::Paragraph(paragraph(3, Some("Heading2"), "Section 1.1")),
                    Block::Paragraph(paragraph(4, None, "body text 2")),
                ],
            },
            ..DocxDocument::default()
        }
    }

    #[test]
    fn test_nearest_heading_wins() {
        let index = SectionIndex::build(&doc_with_headings());
        assert_eq!(index.section_for(2), Some("Chapter 1"));
        assert_eq!(index.section_for(3), Some("Section 1.1"));
        assert_eq!(index.section_for(4), Some("Section 1.1"));
    }

    #[test]
    fn test_heading_paragraph_maps_to_itself() {
        let index = SectionIndex::build(&doc_with_headings());
        assert_eq!(index.section_for(1), Some("Chapter 1"));
    }

    #[test]
    fn test_index_zero_has_no_section() {
        let index = SectionIndex::build(&doc_with_headings());
        assert_eq!(index.section_for(0), None);
    }

    #[test]
    fn test_blank_headings_excluded() {
        let doc = DocxDocument {
            body: Body {
                blocks: vec![
                    Block::Paragraph(paragraph(1, Some("Heading1"), "   ")),
                    Block::Paragraph(paragraph(2, None, "body")),
                ],
            },
            ..DocxDocument::default()
        };
        let index = SectionIndex::build(&doc);
        assert!(index.is_empty());
        assert_eq!(index.section_for(2), None);
    }

    #[test]
    fn test_annotate_findings() {
        let index = SectionIndex::build(&doc_with_headings());
        let mut findings = vec![
            Finding::error("TestRule", "after chapter", Location::paragraph(2)),
            Finding::error("TestRule", "after section", Location::paragraph(4)),
            Finding::warning("TestRule", "unanchored", Location::default()),
        ];
        index.annotate(&mut findings);

        assert_eq!(findings[0].location.section, "Chapter 1");
        assert_eq!(findings[1].location.section, "Section 1.1");
        assert_eq!(findings[2].location.section, "");
    }
}
