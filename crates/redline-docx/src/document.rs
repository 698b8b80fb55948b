//! In-memory model of the parts of a DOCX document the validator inspects.
//!
//! The model is deliberately partial: it keeps paragraph/run structure,
//! the formatting properties the rules resolve, the style catalog with its
//! `basedOn` links, and document defaults. Everything else in the package
//! (fields, settings, headers, media) is ignored by the reader and survives
//! untouched through annotated re-serialization.
//!
//! Property structs use `Option` fields throughout so that "attribute present
//! with value 0" and "attribute absent" stay distinguishable at every level
//! of the style-inheritance chain.

use std::collections::HashMap;

/// Paragraph justification values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justification {
    /// Left-aligned (also the hard fallback when nothing is specified).
    Left,
    /// Right-aligned.
    Right,
    /// Centered.
    Center,
    /// Full justification (both margins).
    Both,
    /// Distributed (East Asian full justification).
    Distribute,
}

impl Justification {
    /// Parse a `w:jc` value. Unknown values return `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "right" | "end" => Some(Self::Right),
            "center" => Some(Self::Center),
            "both" | "justify" => Some(Self::Both),
            "distribute" => Some(Self::Distribute),
            _ => None,
        }
    }

    /// Human-readable alignment name used in finding messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Both => "fully justified",
            Self::Distribute => "distributed",
        }
    }
}

/// Line spacing rule (`w:lineRule`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRule {
    /// Value is in 240ths of a line.
    Auto,
    /// Value is an exact height in twips.
    Exact,
    /// Value is a minimum height in twips.
    AtLeast,
}

impl LineRule {
    /// Parse a `w:lineRule` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "exact" => Some(Self::Exact),
            "atLeast" => Some(Self::AtLeast),
            _ => None,
        }
    }
}

/// A `w:spacing` before/after amount.
///
/// OOXML stores these as twip strings, but "auto" is legal and must stay
/// distinguishable from any numeric value: an auto amount never matches an
/// allowed spacing set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpacingValue {
    /// Explicit amount in twips.
    Twips(i32),
    /// Automatic spacing.
    Auto,
}

impl SpacingValue {
    /// Parse a raw attribute value; anything non-numeric is `Auto`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value.parse().map_or(Self::Auto, Self::Twips)
    }

    /// Twips value, with `Auto` mapped to the sentinel -1 that fails any
    /// allowed-set membership test.
    #[inline]
    #[must_use]
    pub const fn twips_or_sentinel(self) -> i32 {
        match self {
            Self::Twips(v) => v,
            Self::Auto => -1,
        }
    }
}

/// Indentation attributes of `w:ind`. All fields are twips except
/// `first_line_chars` (hundredths of a character width).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indentation {
    /// Left indent (`w:left` / `w:start`).
    pub left: Option<i32>,
    /// First-line indent (`w:firstLine`).
    pub first_line: Option<i32>,
    /// Hanging indent (`w:hanging`); effective first-line = -hanging.
    pub hanging: Option<i32>,
    /// First-line indent in hundredths of a character (`w:firstLineChars`).
    pub first_line_chars: Option<i32>,
}

impl Indentation {
    /// Whether any first-line-related attribute is explicitly present.
    /// "Set to 0" and "not set" are different answers here.
    #[inline]
    #[must_use]
    pub const fn has_explicit_first_line(&self) -> bool {
        self.first_line.is_some() || self.hanging.is_some() || self.first_line_chars.is_some()
    }

    /// Effective first-line indent in twips.
    ///
    /// `firstLineChars` is approximated at ~2.5 twips per unit; a hanging
    /// indent reads as a negative first-line indent.
    #[must_use]
    pub fn first_line_twips(&self) -> i32 {
        if let Some(first_line) = self.first_line {
            first_line
        } else if let Some(chars) = self.first_line_chars {
            (f64::from(chars) * 2.5) as i32
        } else if let Some(hanging) = self.hanging {
            -hanging
        } else {
            0
        }
    }

    /// Left indent in twips (0 when absent).
    #[inline]
    #[must_use]
    pub fn left_twips(&self) -> i32 {
        self.left.unwrap_or(0)
    }

    /// True when no attribute at all is present.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_none() && !self.has_explicit_first_line()
    }
}

/// Spacing attributes of `w:spacing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacing {
    /// Spacing before the paragraph.
    pub before: Option<SpacingValue>,
    /// Spacing after the paragraph.
    pub after: Option<SpacingValue>,
    /// Line spacing value (interpretation depends on `line_rule`).
    pub line: Option<i32>,
    /// Line spacing rule; absent means `Auto`.
    pub line_rule: Option<LineRule>,
}

/// Numbering reference (`w:numPr`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Numbering {
    /// Numbering definition id (`w:numId`).
    pub num_id: Option<i32>,
    /// 0-based nesting level (`w:ilvl`).
    pub level: Option<i32>,
}

/// Paragraph-level properties (`w:pPr`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Referenced paragraph style id (`w:pStyle`).
    pub style_id: Option<String>,
    /// Numbering reference, present on list items.
    pub numbering: Option<Numbering>,
    /// Block formatting attributes.
    pub format: BlockFormat,
}

/// Block formatting shared by direct paragraph properties, style paragraph
/// properties and document defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockFormat {
    /// Justification (`w:jc`).
    pub justification: Option<Justification>,
    /// Indentation (`w:ind`), `Some` iff the element is present.
    pub indentation: Option<Indentation>,
    /// Spacing (`w:spacing`), `Some` iff the element is present.
    pub spacing: Option<Spacing>,
}

/// Run-level properties (`w:rPr`), also used for style run properties and
/// document run defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// ASCII font family (`w:rFonts w:ascii`).
    pub font: Option<String>,
    /// Font size in half-points (`w:sz`).
    pub size_half_pt: Option<u32>,
    /// Bold toggle (`w:b`), `Some(false)` when explicitly switched off.
    pub bold: Option<bool>,
}

impl RunProperties {
    /// Font size in points, if present.
    #[inline]
    #[must_use]
    pub fn size_pt(&self) -> Option<f64> {
        self.size_half_pt.map(|hp| f64::from(hp) / 2.0)
    }
}

/// One piece of run content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// A text fragment (`w:t`).
    Text(String),
    /// A tab character (`w:tab`).
    Tab,
    /// A line break (`w:br`).
    Break,
    /// An embedded drawing or legacy picture (`w:drawing` / `w:pict`).
    Drawing,
}

/// A text run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// Run properties, if a `w:rPr` was present.
    pub properties: RunProperties,
    /// Ordered run content.
    pub content: Vec<RunContent>,
}

impl Run {
    /// Concatenated text of the run.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            if let RunContent::Text(t) = item {
                out.push_str(t);
            }
        }
        out
    }

    /// Whether the run holds an embedded image.
    #[must_use]
    pub fn has_drawing(&self) -> bool {
        self.content.iter().any(|c| matches!(c, RunContent::Drawing))
    }

    /// Whether the run opens with a tab character before any text.
    #[must_use]
    pub fn starts_with_tab(&self) -> bool {
        for item in &self.content {
            match item {
                RunContent::Tab => return true,
                RunContent::Text(t) if !t.is_empty() => return false,
                _ => {}
            }
        }
        false
    }
}

/// A paragraph, carrying its global 1-based position in document order.
///
/// Indices are assigned once at parse time and count every paragraph,
/// including those nested in table cells, so every rule and the section
/// attribution pass agree on what "paragraph N" means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Global 1-based paragraph index in document order.
    pub index: usize,
    /// Paragraph properties, if a `w:pPr` was present.
    pub properties: ParagraphProperties,
    /// The paragraph's runs.
    pub runs: Vec<Run>,
    /// Field instruction texts found in the paragraph (`w:instrText` content
    /// and `w:fldSimple` instructions).
    pub field_codes: Vec<String>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            for item in &run.content {
                if let RunContent::Text(t) = item {
                    out.push_str(t);
                }
            }
        }
        out
    }

    /// Whether the paragraph has any non-whitespace text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text().trim().is_empty()
    }

    /// Referenced style id, if any.
    #[inline]
    #[must_use]
    pub fn style_id(&self) -> Option<&str> {
        self.properties.style_id.as_deref()
    }

    /// Numbering definition id, present on list items.
    #[inline]
    #[must_use]
    pub fn numbering_id(&self) -> Option<i32> {
        self.properties.numbering.and_then(|n| n.num_id)
    }

    /// List nesting level (0 when unspecified).
    #[inline]
    #[must_use]
    pub fn numbering_level(&self) -> i32 {
        self.properties
            .numbering
            .and_then(|n| n.level)
            .unwrap_or(0)
    }

    /// Whether the paragraph is a list item (has a numbering reference).
    #[inline]
    #[must_use]
    pub const fn is_list_item(&self) -> bool {
        self.properties.numbering.is_some()
    }

    /// Whether the paragraph embeds an image.
    #[must_use]
    pub fn contains_image(&self) -> bool {
        self.runs.iter().any(Run::has_drawing)
    }

    /// Whether the paragraph's first run opens with a tab character, the
    /// usual symptom of a tab used as a fake first-line indent.
    #[must_use]
    pub fn starts_with_tab(&self) -> bool {
        self.runs.first().is_some_and(Run::starts_with_tab)
    }
}

/// A table; only the paragraphs inside its cells matter to the rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Cell paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
}

/// A top-level block element of the body.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A body paragraph.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
}

/// The document body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    /// Top-level block elements in document order.
    pub blocks: Vec<Block>,
}

impl Body {
    /// All paragraphs in document order, including table-cell paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Paragraph(p) => std::slice::from_ref(p).iter(),
            Block::Table(t) => t.paragraphs.iter(),
        })
    }

    /// Only the paragraphs that are direct children of the body.
    pub fn direct_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Total paragraph count, table cells included.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }
}

/// Style type attribute of a style definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StyleType {
    /// Paragraph style.
    #[default]
    Paragraph,
    /// Character style.
    Character,
    /// Table style.
    Table,
    /// Numbering style.
    Numbering,
}

impl StyleType {
    /// Parse a `w:type` value; unknown values default to `Paragraph` (the
    /// OOXML default when the attribute is absent).
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "character" => Self::Character,
            "table" => Self::Table,
            "numbering" => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// One style definition from `word/styles.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    /// Style id (`w:styleId`), the key paragraphs reference.
    pub id: String,
    /// Display name (`w:name`), localized by the authoring application.
    pub name: Option<String>,
    /// Style type.
    pub style_type: StyleType,
    /// Parent style id (`w:basedOn`).
    pub based_on: Option<String>,
    /// Whether this style is the default for its type (`w:default`).
    pub is_default: bool,
    /// 0-based outline level; 0–8 map to heading levels 1–9, 9 means body
    /// text.
    pub outline_level: Option<u8>,
    /// Paragraph formatting defaults of the style.
    pub format: BlockFormat,
    /// Run formatting defaults of the style.
    pub run: RunProperties,
}

/// Document-wide defaults (`w:docDefaults`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocDefaults {
    /// Default paragraph formatting.
    pub format: BlockFormat,
    /// Default run formatting.
    pub run: RunProperties,
}

/// The style catalog of a document.
///
/// Lookup is case-insensitive: authoring applications are inconsistent about
/// style-id casing between `document.xml` and `styles.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleCatalog {
    styles: Vec<Style>,
    by_id: HashMap<String, usize>,
    /// Document-wide formatting defaults.
    pub defaults: DocDefaults,
}

impl StyleCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style. A later style with the same id (any casing) shadows an
    /// earlier one for lookup but keeps catalog order for default scanning.
    pub fn push(&mut self, style: Style) {
        self.by_id.insert(style.id.to_lowercase(), self.styles.len());
        self.styles.push(style);
    }

    /// Look up a style by id, case-insensitively.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.by_id
            .get(&id.to_lowercase())
            .map(|&idx| &self.styles[idx])
    }

    /// The default paragraph style, if any.
    ///
    /// A well-formed catalog marks exactly one paragraph style as default.
    /// With several marked, the first in catalog order wins (and the reader
    /// logs a warning); with none, callers fall through to document
    /// defaults.
    #[must_use]
    pub fn default_paragraph_style(&self) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.style_type == StyleType::Paragraph && s.is_default)
    }

    /// All styles in catalog order.
    #[must_use]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Number of styles marked default-for-paragraph-type.
    #[must_use]
    pub fn default_paragraph_style_count(&self) -> usize {
        self.styles
            .iter()
            .filter(|s| s.style_type == StyleType::Paragraph && s.is_default)
            .count()
    }
}

/// A parsed document: body plus style catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxDocument {
    /// The document body.
    pub body: Body,
    /// The style catalog, including document defaults.
    pub styles: StyleCatalog,
}

impl DocxDocument {
    /// All paragraphs in document order, table cells included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }
}
