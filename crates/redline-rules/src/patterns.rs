//! Locale-aware style classification tables.
//!
//! Word localizes built-in style ids and names ("Heading 1" vs "Nagłówek 1"),
//! so rules classify styles by case-insensitive substring match against one
//! declarative table. Supporting a new locale means adding rows here, not
//! touching rule code.

/// What a style-id/name substring indicates about the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Heading styles.
    Heading,
    /// Document title styles.
    Title,
    /// Subtitle styles.
    Subtitle,
    /// Figure/table caption styles.
    Caption,
    /// Table-of-contents styles (including "TOC Heading", which carries an
    /// outline level but is not a real heading).
    Toc,
    /// Quotation styles.
    Quote,
    /// Page header styles.
    Header,
    /// Page footer styles.
    Footer,
    /// Footnote and endnote styles.
    Footnote,
    /// Any list-related style.
    List,
    /// Specifically the built-in "List Paragraph" style.
    ListParagraph,
    /// Figure styles.
    Figure,
    /// Table styles.
    Table,
    /// Bibliography styles.
    Bibliography,
}

/// The classification table: `(lowercase substring, kind)`.
///
/// Substrings are matched against lowercased style ids (or display names,
/// where a rule prefers those). Locales covered: English, Polish (both the
/// ASCII-mangled ids Word produces and the diacritic forms), German, French,
/// Spanish, Italian.
pub const STYLE_PATTERNS: &[(&str, StyleKind)] = &[
    ("heading", StyleKind::Heading),
    ("nagwek", StyleKind::Heading),
    ("nagłówek", StyleKind::Heading),
    ("überschrift", StyleKind::Heading),
    ("subtitle", StyleKind::Subtitle),
    ("podtytu", StyleKind::Subtitle),
    ("title", StyleKind::Title),
    ("tytu", StyleKind::Title),
    ("caption", StyleKind::Caption),
    ("podpis", StyleKind::Caption),
    ("legenda", StyleKind::Caption),
    ("beschriftung", StyleKind::Caption),
    ("toc", StyleKind::Toc),
    ("tableofcontents", StyleKind::Toc),
    ("contents", StyleKind::Toc),
    ("spistreci", StyleKind::Toc),
    ("spis", StyleKind::Toc),
    ("quote", StyleKind::Quote),
    ("cytat", StyleKind::Quote),
    ("header", StyleKind::Header),
    ("footer", StyleKind::Footer),
    ("footnote", StyleKind::Footnote),
    ("endnote", StyleKind::Footnote),
    ("listparagraph", StyleKind::ListParagraph),
    ("akapitzlist", StyleKind::ListParagraph),
    ("list", StyleKind::List),
    ("lista", StyleKind::List),
    ("figure", StyleKind::Figure),
    ("rysunek", StyleKind::Figure),
    ("table", StyleKind::Table),
    ("tabela", StyleKind::Table),
    ("bibliography", StyleKind::Bibliography),
    ("bibliografia", StyleKind::Bibliography),
];

/// Style-id prefixes that carry a trailing heading level ("Heading1",
/// "Nagwek2", "berschrift3", ...), lowercase.
pub const HEADING_PREFIXES: &[&str] = &[
    "heading",      // English
    "nagwek",       // Polish (ASCII style id)
    "nagłówek",     // Polish (with diacritics)
    "überschrift",  // German
    "titre",        // French
    "título",       // Spanish
    "titolo",       // Italian
];

/// Kinds that disqualify a style from being a heading even when it carries
/// digits or an outline level (e.g. "TOC Heading" has outlineLvl 9).
pub const NON_HEADING_KINDS: &[StyleKind] = &[
    StyleKind::Toc,
    StyleKind::Caption,
    StyleKind::Title,
    StyleKind::Subtitle,
    StyleKind::Header,
    StyleKind::Footer,
    StyleKind::Footnote,
    StyleKind::ListParagraph,
];

/// Kinds exempt from the full-justification requirement.
pub const JUSTIFICATION_EXEMPT_KINDS: &[StyleKind] = &[
    StyleKind::Heading,
    StyleKind::Title,
    StyleKind::Subtitle,
    StyleKind::Caption,
    StyleKind::Toc,
    StyleKind::Quote,
    StyleKind::Header,
    StyleKind::Footer,
    StyleKind::List,
];

/// Kinds the no-trailing-period rule applies to.
pub const TITLE_LIKE_KINDS: &[StyleKind] = &[
    StyleKind::Heading,
    StyleKind::Title,
    StyleKind::Subtitle,
    StyleKind::Caption,
];

/// Kinds excluded from the manual-heading detection.
pub const HEADING_USAGE_EXEMPT_KINDS: &[StyleKind] = &[
    StyleKind::Toc,
    StyleKind::Header,
    StyleKind::Footer,
    StyleKind::Caption,
    StyleKind::Title,
    StyleKind::Subtitle,
    StyleKind::ListParagraph,
    StyleKind::Footnote,
];

/// Kinds exempt from the first-line-indent requirement.
pub const INDENT_EXEMPT_KINDS: &[StyleKind] = &[
    StyleKind::Heading,
    StyleKind::Title,
    StyleKind::Toc,
    StyleKind::Caption,
    StyleKind::Figure,
    StyleKind::Table,
    StyleKind::Bibliography,
    StyleKind::List,
];

/// Whether `text` (a style id or name) matches any pattern of the given
/// kinds, case-insensitively.
#[must_use]
pub fn matches_any(text: &str, kinds: &[StyleKind]) -> bool {
    let lower = text.to_lowercase();
    STYLE_PATTERNS
        .iter()
        .any(|(pattern, kind)| kinds.contains(kind) && lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_patterns() {
        assert!(matches_any("Heading1", &[StyleKind::Heading]));
        assert!(matches_any("Nagwek2", &[StyleKind::Heading]));
        assert!(matches_any("Überschrift1", &[StyleKind::Heading]));
        assert!(!matches_any("Normal", &[StyleKind::Heading]));
    }

    #[test]
    fn test_non_heading_rejections() {
        assert!(matches_any("TOCHeading", NON_HEADING_KINDS));
        assert!(matches_any("TOC1", NON_HEADING_KINDS));
        assert!(matches_any("Spistreci", NON_HEADING_KINDS));
        assert!(matches_any("Caption", NON_HEADING_KINDS));
        assert!(matches_any("ListParagraph", NON_HEADING_KINDS));
        assert!(matches_any("Footer", NON_HEADING_KINDS));
        // A plain heading style must not be rejected.
        assert!(!matches_any("Heading1", NON_HEADING_KINDS));
    }

    #[test]
    fn test_subtitle_also_matches_title_kind() {
        // "subtitle" contains "title"; any set with Title also catches
        // subtitles, which is what every consumer of Title wants.
        assert!(matches_any("Subtitle", &[StyleKind::Title]));
        assert!(matches_any("Subtitle", &[StyleKind::Subtitle]));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches_any("HEADING1", &[StyleKind::Heading]));
        assert!(matches_any("quote", JUSTIFICATION_EXEMPT_KINDS));
        assert!(matches_any("Cytat", JUSTIFICATION_EXEMPT_KINDS));
    }

    #[test]
    fn test_list_broad_vs_list_paragraph_narrow() {
        // Justification exempts any list style; heading rejection only the
        // built-in List Paragraph style.
        assert!(matches_any("ListBullet", JUSTIFICATION_EXEMPT_KINDS));
        assert!(!matches_any("ListBullet", NON_HEADING_KINDS));
        assert!(matches_any("ListParagraph", NON_HEADING_KINDS));
    }

    #[test]
    fn test_indent_exemptions() {
        assert!(matches_any("Bibliography", INDENT_EXEMPT_KINDS));
        assert!(matches_any("FigureCaption", INDENT_EXEMPT_KINDS));
        assert!(!matches_any("BodyText", INDENT_EXEMPT_KINDS));
    }
}
