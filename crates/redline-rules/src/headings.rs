//! Heading detection that works across Word locales.
//!
//! Resolution order:
//! 1. Reject known non-heading styles (TOC, caption, title, ...) even when
//!    they carry digits or an outline level.
//! 2. Parse the level from the style id itself ("Heading1", "Nagwek2", ...).
//! 3. Fall back to the outline level stored on the style, walking the
//!    `basedOn` chain (locale-independent, and the only signal for custom
//!    heading styles).

use crate::patterns::{self, HEADING_PREFIXES, NON_HEADING_KINDS};
use redline_docx::{DocxDocument, Paragraph, StyleCatalog};
use std::collections::HashSet;

/// Returns the 1-based heading level of a paragraph, or `None` when the
/// paragraph does not use a heading style.
#[must_use]
pub fn heading_level(doc: &DocxDocument, paragraph: &Paragraph) -> Option<u8> {
    let style_id = paragraph.style_id()?;
    if style_id.is_empty() {
        return None;
    }

    if patterns::matches_any(style_id, NON_HEADING_KINDS) {
        return None;
    }

    if let Some(level) = parse_level_from_style_id(style_id) {
        return Some(level);
    }

    outline_level_from_style(&doc.styles, style_id)
}

/// Whether the paragraph uses any heading style.
#[must_use]
pub fn is_heading(doc: &DocxDocument, paragraph: &Paragraph) -> bool {
    heading_level(doc, paragraph).is_some()
}

/// Try to parse a 1-based level from the style id by stripping a trailing
/// digit suffix and matching the remaining prefix against the known
/// per-locale heading words.
fn parse_level_from_style_id(style_id: &str) -> Option<u8> {
    let prefix_part = style_id.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix_part.len() == style_id.len() {
        return None; // no trailing digits
    }

    let prefix = prefix_part.trim_end().to_lowercase();
    if !HEADING_PREFIXES.contains(&prefix.as_str()) {
        return None;
    }

    style_id[prefix_part.len()..]
        .parse::<u8>()
        .ok()
        .filter(|&level| level >= 1)
}

/// Outline-level fallback: 0-based in storage, 0–8 map to heading levels
/// 1–9; 9 means body text. A style without its own outline level defers to
/// its `basedOn` ancestors, cycle-guarded.
fn outline_level_from_style(catalog: &StyleCatalog, style_id: &str) -> Option<u8> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = style_id.to_string();

    loop {
        if !visited.insert(current.to_lowercase()) {
            return None;
        }
        let style = catalog.get(&current)?;
        if let Some(level) = style.outline_level {
            if level <= 8 {
                return Some(level + 1);
            }
            // Outline level 9 marks body text; keep walking in case an
            // ancestor is a real heading style.
        }
        match &style.based_on {
            Some(parent) => current = parent.clone(),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{ParagraphProperties, Style};

    fn paragraph_with_style(style_id: &str) -> Paragraph {
        Paragraph {
            index: 1,
            properties: ParagraphProperties {
                style_id: Some(style_id.to_string()),
                ..ParagraphProperties::default()
            },
            ..Paragraph::default()
        }
    }

    #[test]
    fn test_level_from_english_style_id() {
        let doc = DocxDocument::default();
        assert_eq!(heading_level(&doc, &paragraph_with_style("Heading1")), Some(1));
        assert_eq!(heading_level(&doc, &paragraph_with_style("heading3")), Some(3));
        assert_eq!(heading_level(&doc, &paragraph_with_style("Heading9")), Some(9));
    }

    #[test]
    fn test_level_from_localized_style_ids() {
        let doc = DocxDocument::default();
        assert_eq!(heading_level(&doc, &paragraph_with_style("Nagwek2")), Some(2));
        assert_eq!(heading_level(&doc, &paragraph_with_style("Nagłówek1")), Some(1));
        assert_eq!(heading_level(&doc, &paragraph_with_style("Titre4")), Some(4));
        assert_eq!(heading_level(&doc, &paragraph_with_style("Titolo2")), Some(2));
    }

    #[test]
    fn test_non_heading_styles_rejected_despite_digits() {
        let doc = DocxDocument::default();
        assert_eq!(heading_level(&doc, &paragraph_with_style("TOC1")), None);
        assert_eq!(heading_level(&doc, &paragraph_with_style("Caption2")), None);
        assert_eq!(heading_level(&doc, &paragraph_with_style("Footer1")), None);
        assert_eq!(heading_level(&doc, &paragraph_with_style("ListParagraph1")), None);
    }

    #[test]
    fn test_toc_heading_with_outline_level_rejected() {
        // "TOC Heading" styles carry outlineLvl 9 in real documents and must
        // never classify as headings.
        let mut doc = DocxDocument::default();
        doc.styles.push(Style {
            id: "TOCHeading".to_string(),
            outline_level: Some(9),
            ..Style::default()
        });
        assert_eq!(heading_level(&doc, &paragraph_with_style("TOCHeading")), None);
    }

    #[test]
    fn test_outline_level_fallback() {
        let mut doc = DocxDocument::default();
        doc.styles.push(Style {
            id: "Rozdzial".to_string(),
            outline_level: Some(0),
            ..Style::default()
        });
        assert_eq!(heading_level(&doc, &paragraph_with_style("Rozdzial")), Some(1));
    }

    #[test]
    fn test_outline_level_nine_is_body_text() {
        let mut doc = DocxDocument::default();
        doc.styles.push(Style {
            id: "BodyOutline".to_string(),
            outline_level: Some(9),
            ..Style::default()
        });
        assert_eq!(heading_level(&doc, &paragraph_with_style("BodyOutline")), None);
    }

    #[test]
    fn test_outline_level_through_based_on_chain() {
        let mut doc = DocxDocument::default();
        doc.styles.push(Style {
            id: "ChapterBase".to_string(),
            outline_level: Some(1),
            ..Style::default()
        });
        doc.styles.push(Style {
            id: "ChapterFancy".to_string(),
            based_on: Some("ChapterBase".to_string()),
            ..Style::default()
        });
        assert_eq!(
            heading_level(&doc, &paragraph_with_style("ChapterFancy")),
            Some(2)
        );
    }

    #[test]
    fn test_based_on_cycle_is_not_a_heading() {
        let mut doc = DocxDocument::default();
        doc.styles.push(Style {
            id: "Loop".to_string(),
            based_on: Some("Loop".to_string()),
            ..Style::default()
        });
        assert_eq!(heading_level(&doc, &paragraph_with_style("Loop")), None);
    }

    #[test]
    fn test_no_style_is_not_a_heading() {
        let doc = DocxDocument::default();
        let para = Paragraph {
            index: 1,
            ..Paragraph::default()
        };
        assert!(!is_heading(&doc, &para));
    }

    #[test]
    fn test_digitless_prefix_is_not_a_heading_without_outline() {
        let doc = DocxDocument::default();
        assert_eq!(heading_level(&doc, &paragraph_with_style("Heading")), None);
    }

    #[test]
    fn test_level_zero_suffix_rejected() {
        let doc = DocxDocument::default();
        assert_eq!(heading_level(&doc, &paragraph_with_style("Heading0")), None);
    }
}
