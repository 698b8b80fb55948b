//! Effective-formatting resolution.
//!
//! A formatting value in OOXML can come from five places, in priority order:
//! direct run/paragraph properties, the paragraph's named style, that style's
//! `basedOn` ancestors, the catalog's default paragraph style (and *its*
//! ancestors), and finally document-wide defaults. Every resolver here walks
//! that chain with a visited set, so a catalog whose `basedOn` links form a
//! cycle terminates with "not found" instead of looping.
//!
//! Resolvers never fail; "no information anywhere" is `None` (or the
//! documented hard fallback).

use redline_docx::{
    BlockFormat, DocxDocument, Justification, LineRule, Paragraph, Run, RunProperties,
    SpacingValue, StyleCatalog,
};
use std::collections::HashSet;

/// Line spacing value meaning 1.5 lines under the auto rule (240ths of a
/// line).
pub const LINE_SPACING_ONE_AND_HALF: i32 = 360;

/// Resolves effective formatting values against a document's style catalog.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    catalog: &'a StyleCatalog,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver for a document.
    #[must_use]
    pub fn new(doc: &'a DocxDocument) -> Self {
        Self {
            catalog: &doc.styles,
        }
    }

    /// Walk a style and its `basedOn` ancestors, returning the first value
    /// `pick` produces. Revisiting a style id ends the walk.
    fn walk_chain<T>(
        &self,
        style_id: &str,
        pick: impl Fn(&redline_docx::Style) -> Option<T>,
    ) -> Option<T> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = style_id.to_string();

        loop {
            if !visited.insert(current.to_lowercase()) {
                return None;
            }
            let style = self.catalog.get(&current)?;
            if let Some(value) = pick(style) {
                return Some(value);
            }
            match &style.based_on {
                Some(parent) => current = parent.clone(),
                None => return None,
            }
        }
    }

    /// Resolve a paragraph-level attribute through the full chain.
    fn resolve_block_attr<T>(
        &self,
        paragraph: &Paragraph,
        pick: impl Fn(&BlockFormat) -> Option<T> + Copy,
    ) -> Option<T> {
        if let Some(value) = pick(&paragraph.properties.format) {
            return Some(value);
        }
        if let Some(style_id) = paragraph.style_id() {
            if let Some(value) = self.walk_chain(style_id, |s| pick(&s.format)) {
                return Some(value);
            }
        }
        if let Some(default) = self.catalog.default_paragraph_style() {
            if let Some(value) = self.walk_chain(&default.id, |s| pick(&s.format)) {
                return Some(value);
            }
        }
        pick(&self.catalog.defaults.format)
    }

    /// Resolve a run-level attribute through the full chain.
    fn resolve_run_attr<T>(
        &self,
        paragraph: &Paragraph,
        run: Option<&Run>,
        pick: impl Fn(&RunProperties) -> Option<T> + Copy,
    ) -> Option<T> {
        if let Some(run) = run {
            if let Some(value) = pick(&run.properties) {
                return Some(value);
            }
        }
        if let Some(style_id) = paragraph.style_id() {
            if let Some(value) = self.walk_chain(style_id, |s| pick(&s.run)) {
                return Some(value);
            }
        }
        if let Some(default) = self.catalog.default_paragraph_style() {
            if let Some(value) = self.walk_chain(&default.id, |s| pick(&s.run)) {
                return Some(value);
            }
        }
        pick(&self.catalog.defaults.run)
    }

    /// Effective font family of a run.
    #[must_use]
    pub fn font(&self, paragraph: &Paragraph, run: Option<&Run>) -> Option<String> {
        self.resolve_run_attr(paragraph, run, |r| r.font.clone())
    }

    /// Effective font size in points.
    #[must_use]
    pub fn font_size_pt(&self, paragraph: &Paragraph, run: Option<&Run>) -> Option<f64> {
        self.resolve_run_attr(paragraph, run, |r| r.size_half_pt)
            .map(|half| f64::from(half) / 2.0)
    }

    /// Effective bold flag; false when nothing in the chain says otherwise.
    #[must_use]
    pub fn bold(&self, paragraph: &Paragraph, run: Option<&Run>) -> bool {
        self.resolve_run_attr(paragraph, run, |r| r.bold)
            .unwrap_or(false)
    }

    /// Effective justification; hard fallback is left alignment.
    #[must_use]
    pub fn justification(&self, paragraph: &Paragraph) -> Justification {
        self.resolve_block_attr(paragraph, |f| f.justification)
            .unwrap_or(Justification::Left)
    }

    /// Effective first-line indent in twips; hard fallback 0.
    ///
    /// An indentation element with an explicit first-line value of 0 stops
    /// the chain; an element that simply lacks first-line attributes does
    /// not.
    #[must_use]
    pub fn first_line_indent_twips(&self, paragraph: &Paragraph) -> i32 {
        self.resolve_block_attr(paragraph, |f| {
            f.indentation.and_then(|ind| {
                ind.has_explicit_first_line().then(|| ind.first_line_twips())
            })
        })
        .unwrap_or(0)
    }

    /// Effective left indent in twips; hard fallback 0.
    #[must_use]
    pub fn left_indent_twips(&self, paragraph: &Paragraph) -> i32 {
        self.resolve_block_attr(paragraph, |f| f.indentation.and_then(|ind| ind.left))
            .unwrap_or(0)
    }

    /// Effective line spacing: `(value, rule)`. The rule is `None` when the
    /// spacing element does not specify one (which reads as auto).
    #[must_use]
    pub fn line_spacing(&self, paragraph: &Paragraph) -> Option<(i32, Option<LineRule>)> {
        self.resolve_block_attr(paragraph, |f| {
            f.spacing
                .and_then(|s| s.line.map(|line| (line, s.line_rule)))
        })
    }

    /// Whether the paragraph's effective line spacing is 1.5 lines.
    ///
    /// Only the value 360 counts, and only under the auto rule (or no rule);
    /// "exact"/"atLeast" values are measured in twips and never mean 1.5
    /// lines regardless of the number.
    #[must_use]
    pub fn has_one_and_half_line_spacing(&self, paragraph: &Paragraph) -> bool {
        match self.line_spacing(paragraph) {
            Some((LINE_SPACING_ONE_AND_HALF, None | Some(LineRule::Auto))) => true,
            _ => false,
        }
    }

    /// Effective spacing before the paragraph, in twips; 0 when unresolved.
    /// An "auto" amount carries no number and reads as not set at that level.
    #[must_use]
    pub fn spacing_before_twips(&self, paragraph: &Paragraph) -> i32 {
        self.resolve_block_attr(paragraph, |f| {
            f.spacing.and_then(|s| s.before).and_then(|v| match v {
                SpacingValue::Twips(t) => Some(t),
                SpacingValue::Auto => None,
            })
        })
        .unwrap_or(0)
    }

    /// Effective spacing after the paragraph, in twips; 0 when unresolved.
    #[must_use]
    pub fn spacing_after_twips(&self, paragraph: &Paragraph) -> i32 {
        self.resolve_block_attr(paragraph, |f| {
            f.spacing.and_then(|s| s.after).and_then(|v| match v {
                SpacingValue::Twips(t) => Some(t),
                SpacingValue::Auto => None,
            })
        })
        .unwrap_or(0)
    }

    /// Effective "spacing after" for the allowed-set check, keeping "auto"
    /// distinct: auto resolves to the sentinel -1 so it can never match an
    /// allowed value. Unresolved is 0 (Word's behavior for absent spacing).
    #[must_use]
    pub fn spacing_after_for_check(&self, paragraph: &Paragraph) -> i32 {
        self.resolve_block_attr(paragraph, |f| f.spacing.and_then(|s| s.after))
            .map_or(0, SpacingValue::twips_or_sentinel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::{
        Indentation, ParagraphProperties, Spacing, Style, StyleType,
    };

    fn doc_with_styles(styles: Vec<Style>) -> DocxDocument {
        let mut doc = DocxDocument::default();
        for style in styles {
            doc.styles.push(style);
        }
        doc
    }

    fn styled_paragraph(style_id: &str) -> Paragraph {
        Paragraph {
            index: 1,
            properties: ParagraphProperties {
                style_id: Some(style_id.to_string()),
                ..ParagraphProperties::default()
            },
            ..Paragraph::default()
        }
    }

    fn run_with_font(font: &str) -> Run {
        Run {
            properties: RunProperties {
                font: Some(font.to_string()),
                ..RunProperties::default()
            },
            content: vec![],
        }
    }

    #[test]
    fn test_direct_run_font_wins_over_everything() {
        let mut normal = Style {
            id: "Normal".to_string(),
            style_type: StyleType::Paragraph,
            is_default: true,
            ..Style::default()
        };
        normal.run.font = Some("Calibri".to_string());
        let doc = doc_with_styles(vec![normal]);

        let para = styled_paragraph("Normal");
        let run = run_with_font("Courier New");

        let resolver = StyleResolver::new(&doc);
        assert_eq!(
            resolver.font(&para, Some(&run)).as_deref(),
            Some("Courier New")
        );
    }

    #[test]
    fn test_font_falls_back_through_style_chain() {
        let mut base = Style {
            id: "Base".to_string(),
            ..Style::default()
        };
        base.run.font = Some("Georgia".to_string());
        let derived = Style {
            id: "Derived".to_string(),
            based_on: Some("Base".to_string()),
            ..Style::default()
        };
        let doc = doc_with_styles(vec![base, derived]);

        let para = styled_paragraph("Derived");
        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.font(&para, None).as_deref(), Some("Georgia"));
    }

    #[test]
    fn test_font_falls_back_to_default_style_then_doc_defaults() {
        let mut default_style = Style {
            id: "Normal".to_string(),
            style_type: StyleType::Paragraph,
            is_default: true,
            ..Style::default()
        };
        default_style.run.font = Some("Times New Roman".to_string());
        let doc = doc_with_styles(vec![default_style]);

        // Paragraph without any style reference.
        let para = Paragraph {
            index: 1,
            ..Paragraph::default()
        };
        let resolver = StyleResolver::new(&doc);
        assert_eq!(
            resolver.font(&para, None).as_deref(),
            Some("Times New Roman")
        );

        // No default style either: document defaults are the last resort.
        let mut doc = DocxDocument::default();
        doc.styles.defaults.run.font = Some("Calibri".to_string());
        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.font(&para, None).as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_based_on_cycle_terminates_without_result() {
        let a = Style {
            id: "A".to_string(),
            based_on: Some("B".to_string()),
            ..Style::default()
        };
        let b = Style {
            id: "B".to_string(),
            based_on: Some("A".to_string()),
            ..Style::default()
        };
        let doc = doc_with_styles(vec![a, b]);

        let para = styled_paragraph("A");
        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.font(&para, None), None);
        assert_eq!(resolver.font_size_pt(&para, None), None);
    }

    #[test]
    fn test_self_referential_style_terminates() {
        let selfish = Style {
            id: "Selfish".to_string(),
            based_on: Some("Selfish".to_string()),
            ..Style::default()
        };
        let doc = doc_with_styles(vec![selfish]);
        let para = styled_paragraph("Selfish");
        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.font(&para, None), None);
    }

    #[test]
    fn test_one_and_half_line_spacing_detection() {
        let mut para = Paragraph {
            index: 1,
            ..Paragraph::default()
        };
        let doc = DocxDocument::default();
        let resolver = StyleResolver::new(&doc);

        // 360 + auto rule -> 1.5 lines.
        para.properties.format.spacing = Some(Spacing {
            line: Some(360),
            line_rule: Some(LineRule::Auto),
            ..Spacing::default()
        });
        assert!(resolver.has_one_and_half_line_spacing(&para));

        // 360 + no rule -> still 1.5 lines.
        para.properties.format.spacing = Some(Spacing {
            line: Some(360),
            line_rule: None,
            ..Spacing::default()
        });
        assert!(resolver.has_one_and_half_line_spacing(&para));

        // 360 exact is a twip height, not a multiplier.
        para.properties.format.spacing = Some(Spacing {
            line: Some(360),
            line_rule: Some(LineRule::Exact),
            ..Spacing::default()
        });
        assert!(!resolver.has_one_and_half_line_spacing(&para));

        // Other values never mean 1.5 lines.
        for value in [240, 480] {
            para.properties.format.spacing = Some(Spacing {
                line: Some(value),
                line_rule: Some(LineRule::Auto),
                ..Spacing::default()
            });
            assert!(!resolver.has_one_and_half_line_spacing(&para));
        }
    }

    #[test]
    fn test_explicit_zero_first_line_indent_stops_chain() {
        // Style says 709 twips, paragraph explicitly says 0: 0 wins.
        let mut style = Style {
            id: "Body".to_string(),
            ..Style::default()
        };
        style.format.indentation = Some(Indentation {
            first_line: Some(709),
            ..Indentation::default()
        });
        let doc = doc_with_styles(vec![style]);

        let mut para = styled_paragraph("Body");
        para.properties.format.indentation = Some(Indentation {
            first_line: Some(0),
            ..Indentation::default()
        });

        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.first_line_indent_twips(&para), 0);

        // Indentation present but without first-line info does NOT stop the
        // chain.
        para.properties.format.indentation = Some(Indentation {
            left: Some(200),
            ..Indentation::default()
        });
        assert_eq!(resolver.first_line_indent_twips(&para), 709);
    }

    #[test]
    fn test_spacing_auto_is_sentinel_for_check_but_transparent_for_sum() {
        let mut para = Paragraph {
            index: 1,
            ..Paragraph::default()
        };
        para.properties.format.spacing = Some(Spacing {
            after: Some(SpacingValue::Auto),
            ..Spacing::default()
        });
        let doc = DocxDocument::default();
        let resolver = StyleResolver::new(&doc);

        // For the allowed-set check, auto is the -1 sentinel.
        assert_eq!(resolver.spacing_after_for_check(&para), -1);
        // For the before/after-must-be-zero check, auto reads as unset.
        assert_eq!(resolver.spacing_after_twips(&para), 0);
    }

    #[test]
    fn test_justification_hard_fallback_is_left() {
        let doc = DocxDocument::default();
        let para = Paragraph {
            index: 1,
            ..Paragraph::default()
        };
        let resolver = StyleResolver::new(&doc);
        assert_eq!(resolver.justification(&para), Justification::Left);
    }

    #[test]
    fn test_bold_resolution() {
        let mut heading = Style {
            id: "Heading1".to_string(),
            ..Style::default()
        };
        heading.run.bold = Some(true);
        let doc = doc_with_styles(vec![heading]);

        let para = styled_paragraph("Heading1");
        let resolver = StyleResolver::new(&doc);
        assert!(resolver.bold(&para, None));

        // A run explicitly un-bolded overrides the style.
        let run = Run {
            properties: RunProperties {
                bold: Some(false),
                ..RunProperties::default()
            },
            content: vec![],
        };
        assert!(!resolver.bold(&para, Some(&run)));
    }
}
