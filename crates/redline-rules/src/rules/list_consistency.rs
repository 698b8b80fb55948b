//! List consistency rule: punctuation and indentation across list groups.
//!
//! A list group is a maximal run of consecutive top-level paragraphs sharing
//! one numbering-definition id; the group restarts when the id changes or a
//! non-numbered paragraph intervenes. Within a group, items are compared per
//! nesting level:
//!
//! - Punctuation: every middle item must end with the same trailing mark as
//!   the first item; the last item must end with a period.
//! - Indentation: all items at a level share one left indent; the most
//!   common indent in the group is the expected one.

use crate::resolve::StyleResolver;
use crate::rule::Rule;
use redline_core::{truncate_preview, twips_to_cm, Finding, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument, Paragraph};

/// See module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConsistencyRule;

struct ListItem<'a> {
    paragraph: &'a Paragraph,
    level: i32,
    indent_left: i32,
}

struct ListGroup<'a> {
    numbering_id: i32,
    items: Vec<ListItem<'a>>,
}

impl Rule for ListConsistencyRule {
    fn name(&self) -> &'static str {
        "ListConsistencyRule"
    }

    fn validate(
        &self,
        doc: &DocxDocument,
        _profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let resolver = StyleResolver::new(doc);
        let groups = extract_groups(doc, &resolver);

        let mut findings = Vec::new();
        for group in &groups {
            self.check_punctuation(group, sink, &mut findings);
            self.check_indentation(group, sink, &mut findings);
        }
        findings
    }
}

/// Split the body's top-level paragraphs into list groups.
fn extract_groups<'a>(doc: &'a DocxDocument, resolver: &StyleResolver) -> Vec<ListGroup<'a>> {
    let mut groups: Vec<ListGroup<'a>> = Vec::new();
    let mut current_id: Option<i32> = None;

    for paragraph in doc.body.direct_paragraphs() {
        let Some(numbering_id) = paragraph.numbering_id() else {
            current_id = None;
            continue;
        };

        if current_id != Some(numbering_id) {
            groups.push(ListGroup {
                numbering_id,
                items: Vec::new(),
            });
            current_id = Some(numbering_id);
        }

        let item = ListItem {
            paragraph,
            level: paragraph.numbering_level(),
            indent_left: resolver.left_indent_twips(paragraph),
        };
        if let Some(group) = groups.last_mut() {
            debug_assert_eq!(group.numbering_id, numbering_id);
            group.items.push(item);
        }
    }

    groups
}

/// Group items by nesting level, preserving first-occurrence order.
fn by_level<'g, 'a>(group: &'g ListGroup<'a>) -> Vec<(i32, Vec<&'g ListItem<'a>>)> {
    let mut levels: Vec<(i32, Vec<&'g ListItem<'a>>)> = Vec::new();
    for item in &group.items {
        match levels.iter_mut().find(|(level, _)| *level == item.level) {
            Some((_, items)) => items.push(item),
            None => levels.push((item.level, vec![item])),
        }
    }
    levels
}

/// Trailing punctuation mark of a paragraph's trimmed text, if any.
fn trailing_punctuation(paragraph: &Paragraph) -> Option<char> {
    let text = paragraph.text();
    let trimmed = text.trim_end();
    let last = trimmed.chars().last()?;
    is_punctuation(last).then_some(last)
}

/// Punctuation test covering ASCII marks plus the typographic characters
/// Word documents actually contain.
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '…' | '–' | '—' | '„' | '”' | '’' | '«' | '»')
}

fn punctuation_desc(mark: Option<char>) -> String {
    mark.map_or_else(|| "no punctuation".to_string(), |c| format!("'{c}'"))
}

impl ListConsistencyRule {
    fn check_punctuation(
        &self,
        group: &ListGroup,
        sink: Option<&CommentSink>,
        findings: &mut Vec<Finding>,
    ) {
        if group.items.len() < 2 {
            return;
        }

        for (_, items) in by_level(group) {
            if items.len() < 2 {
                continue;
            }

            let first = items[0];
            let last = items[items.len() - 1];
            let expected = trailing_punctuation(first.paragraph);

            for item in &items[1..items.len() - 1] {
                let actual = trailing_punctuation(item.paragraph);
                if actual == expected {
                    continue;
                }

                let preview = truncate_preview(&item.paragraph.text(), 40);
                let message = format!(
                    "List item ends with {} but first item uses {}. Text: \"{}\"",
                    punctuation_desc(actual),
                    punctuation_desc(expected),
                    preview
                );
                findings.push(Finding::error(
                    self.name(),
                    &message,
                    Location::paragraph_text(item.paragraph.index, preview.clone()),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(item.paragraph, &message);
                }
            }

            let last_mark = trailing_punctuation(last.paragraph);
            if last_mark != Some('.') {
                let preview = truncate_preview(&last.paragraph.text(), 40);
                let message = match last_mark {
                    Some(mark) => format!(
                        "Last list item should end with period (.), found '{mark}'. \
                         Text: \"{preview}\""
                    ),
                    None => format!(
                        "Last list item should end with period (.). Text: \"{preview}\""
                    ),
                };
                findings.push(Finding::error(
                    self.name(),
                    &message,
                    Location::paragraph_text(last.paragraph.index, preview.clone()),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(last.paragraph, &message);
                }
            }
        }
    }

    fn check_indentation(
        &self,
        group: &ListGroup,
        sink: Option<&CommentSink>,
        findings: &mut Vec<Finding>,
    ) {
        for (level, items) in by_level(group) {
            if items.len() < 2 {
                continue;
            }

            // Majority vote, first-seen indent winning ties.
            let mut counts: Vec<(i32, usize)> = Vec::new();
            for item in &items {
                match counts.iter_mut().find(|(indent, _)| *indent == item.indent_left) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((item.indent_left, 1)),
                }
            }
            if counts.len() <= 1 {
                continue;
            }
            // First-seen indent wins ties, so a stable document keeps a
            // stable expectation.
            let (mut expected, mut best) = counts[0];
            for &(indent, count) in &counts[1..] {
                if count > best {
                    best = count;
                    expected = indent;
                }
            }

            for item in items.iter().filter(|i| i.indent_left != expected) {
                let preview = truncate_preview(&item.paragraph.text(), 40);
                let message = format!(
                    "List item has inconsistent indentation ({:.2} cm). \
                     Expected {:.2} cm at level {}. Text: \"{}\"",
                    twips_to_cm(item.indent_left),
                    twips_to_cm(expected),
                    level,
                    preview
                );
                findings.push(Finding::error(
                    self.name(),
                    &message,
                    Location::paragraph_text(item.paragraph.index, preview.clone()),
                ));
                if let Some(sink) = sink {
                    sink.comment_on_paragraph(item.paragraph, &message);
                }
            }
        }
    }
}
