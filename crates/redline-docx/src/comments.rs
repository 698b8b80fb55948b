//! Review-comment annotation.
//!
//! Rules push comments into a [`CommentSink`] while they run; afterwards
//! [`write_annotated`] re-serializes the original package with the comments
//! in place. The original bytes are never mutated in memory: the rewrite is
//! a quick-xml event copy of `word/document.xml` that injects
//! `commentRangeStart`/`commentRangeEnd`/`commentReference` markers around
//! the anchored runs, plus a generated `word/comments.xml` and the matching
//! content-type and relationship entries.
//!
//! The rewrite counts paragraphs and runs exactly the way the reader does
//! (global document order, drawings skipped), so anchors recorded against
//! parsed paragraph indices land on the right XML elements.

use crate::document::Paragraph;
use chrono::{SecondsFormat, Utc};
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use redline_core::{RedlineError, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const COMMENTS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
const COMMENTS_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DEFAULT_AUTHOR: &str = "Redline Validator";

/// Where a pending comment attaches inside its paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// A specific run, 0-based.
    Run(usize),
    /// End of the paragraph (used when the paragraph has no runs).
    ParagraphEnd,
}

#[derive(Debug, Clone)]
struct PendingComment {
    id: i32,
    paragraph: usize,
    anchor: Anchor,
    text: String,
}

/// Collects review comments during rule execution.
///
/// The sink is shared by every rule of one annotated validation run, so the
/// id counter is atomic and the pending list is behind a mutex; comment ids
/// stay unique even if rule execution is ever parallelized.
#[derive(Debug)]
pub struct CommentSink {
    next_id: AtomicI32,
    author: String,
    pending: Mutex<Vec<PendingComment>>,
}

impl CommentSink {
    /// Create a sink with the default author name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_author(DEFAULT_AUTHOR)
    }

    /// Create a sink with a custom comment author.
    #[must_use]
    pub fn with_author(author: &str) -> Self {
        Self {
            next_id: AtomicI32::new(0),
            author: author.to_string(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Attach a comment to a specific run (0-based index) of a paragraph.
    pub fn comment_on_run(&self, paragraph: &Paragraph, run_index: usize, text: &str) {
        let anchor = if run_index < paragraph.runs.len() {
            Anchor::Run(run_index)
        } else if paragraph.runs.is_empty() {
            Anchor::ParagraphEnd
        } else {
            Anchor::Run(0)
        };
        self.push(paragraph.index, anchor, text);
    }

    /// Attach a comment to a whole paragraph. Anchors at the first run, or
    /// at the paragraph end when the paragraph has no runs.
    pub fn comment_on_paragraph(&self, paragraph: &Paragraph, text: &str) {
        let anchor = if paragraph.runs.is_empty() {
            Anchor::ParagraphEnd
        } else {
            Anchor::Run(0)
        };
        self.push(paragraph.index, anchor, text);
    }

    /// Attach a comment at a character range within the paragraph text. The
    /// comment anchors at the first run overlapping the range, falling back
    /// to the first run, then to the paragraph end.
    pub fn comment_at_offset(
        &self,
        paragraph: &Paragraph,
        offset: usize,
        length: usize,
        text: &str,
    ) {
        let mut current = 0usize;
        let mut anchor = None;
        for (idx, run) in paragraph.runs.iter().enumerate() {
            let run_len = run.text().chars().count();
            let run_start = current;
            let run_end = current + run_len;
            if offset < run_end && offset + length > run_start {
                anchor = Some(Anchor::Run(idx));
                break;
            }
            current = run_end;
        }

        let anchor = anchor.unwrap_or(if paragraph.runs.is_empty() {
            Anchor::ParagraphEnd
        } else {
            Anchor::Run(0)
        });
        self.push(paragraph.index, anchor, text);
    }

    /// Number of comments collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Whether no comments have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, paragraph: usize, anchor: Anchor, text: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(PendingComment {
                id,
                paragraph,
                anchor,
                text: text.to_string(),
            });
        }
    }

    fn snapshot(&self) -> Vec<PendingComment> {
        self.pending.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for CommentSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-serialize `original` with the sink's comments injected.
///
/// # Errors
/// Returns an error when the original package cannot be re-read or the
/// rewritten parts fail to serialize.
pub fn write_annotated(original: &[u8], sink: &CommentSink) -> Result<Vec<u8>> {
    let pending = sink.snapshot();
    debug!("writing annotated document with {} comments", pending.len());

    let mut run_anchors: HashMap<(usize, usize), Vec<i32>> = HashMap::new();
    let mut end_anchors: HashMap<usize, Vec<i32>> = HashMap::new();
    for comment in &pending {
        match comment.anchor {
            Anchor::Run(run) => run_anchors
                .entry((comment.paragraph, run))
                .or_default()
                .push(comment.id),
            Anchor::ParagraphEnd => {
                end_anchors.entry(comment.paragraph).or_default().push(comment.id);
            }
        }
    }

    let mut archive = ZipArchive::new(Cursor::new(original))
        .map_err(|e| RedlineError::Archive(format!("failed to reopen DOCX as ZIP: {e}")))?;
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut had_document_rels = false;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| RedlineError::Archive(e.to_string()))?;
        let name = entry.name().to_string();

        if name.ends_with('/') {
            out.add_directory(name, options)
                .map_err(|e| RedlineError::Archive(e.to_string()))?;
            continue;
        }

        let mut raw = Vec::new();
        entry.read_to_end(&mut raw)?;

        let replacement = match name.as_str() {
            "word/document.xml" => {
                let xml = String::from_utf8_lossy(&raw);
                Some(rewrite_document_xml(&xml, &run_anchors, &end_anchors)?)
            }
            "[Content_Types].xml" => {
                let xml = String::from_utf8_lossy(&raw);
                Some(patch_content_types(&xml)?)
            }
            "word/_rels/document.xml.rels" => {
                had_document_rels = true;
                let xml = String::from_utf8_lossy(&raw);
                Some(patch_relationships(&xml)?)
            }
            // Replaced wholesale below; an existing part would conflict with
            // the fresh comment ids.
            "word/comments.xml" => continue,
            _ => None,
        };

        out.start_file(name, options)
            .map_err(|e| RedlineError::Archive(e.to_string()))?;
        out.write_all(replacement.as_deref().unwrap_or(&raw))?;
    }

    if !had_document_rels {
        out.start_file("word/_rels/document.xml.rels", options)
            .map_err(|e| RedlineError::Archive(e.to_string()))?;
        out.write_all(&minimal_relationships()?)?;
    }

    out.start_file("word/comments.xml", options)
        .map_err(|e| RedlineError::Archive(e.to_string()))?;
    out.write_all(&build_comments_xml(&pending, &sink.author)?)?;

    let cursor = out
        .finish()
        .map_err(|e| RedlineError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn xml_err(e: quick_xml::Error) -> RedlineError {
    RedlineError::Xml(e.to_string())
}

fn write_event(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event) -> Result<()> {
    writer.write_event(event).map_err(|e| RedlineError::Xml(e.to_string()))
}

fn write_range_start(writer: &mut Writer<Cursor<Vec<u8>>>, id: i32) -> Result<()> {
    let mut elem = BytesStart::new("w:commentRangeStart");
    let id = id.to_string();
    elem.push_attribute(("w:id", id.as_str()));
    write_event(writer, Event::Empty(elem))
}

fn write_range_end_and_reference(writer: &mut Writer<Cursor<Vec<u8>>>, id: i32) -> Result<()> {
    let id = id.to_string();

    let mut end = BytesStart::new("w:commentRangeEnd");
    end.push_attribute(("w:id", id.as_str()));
    write_event(writer, Event::Empty(end))?;

    write_event(writer, Event::Start(BytesStart::new("w:r")))?;
    let mut reference = BytesStart::new("w:commentReference");
    reference.push_attribute(("w:id", id.as_str()));
    write_event(writer, Event::Empty(reference))?;
    write_event(writer, Event::End(BytesEnd::new("w:r")))
}

/// Copy `word/document.xml`, injecting comment markers at the anchored runs.
fn rewrite_document_xml(
    xml: &str,
    run_anchors: &HashMap<(usize, usize), Vec<i32>>,
    end_anchors: &HashMap<usize, Vec<i32>>,
) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut buf = Vec::new();
    let mut paragraph_counter = 0usize;
    let mut current_paragraph: Option<usize> = None;
    let mut current_run: Option<usize> = None;
    let mut run_counter = 0usize;
    let mut in_body = false;
    let mut drawing_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                match e.name().as_ref() {
                    b"w:body" => in_body = true,
                    b"w:p" if in_body && drawing_depth == 0 => {
                        paragraph_counter += 1;
                        current_paragraph = Some(paragraph_counter);
                        run_counter = 0;
                    }
                    b"w:r" if current_paragraph.is_some() && drawing_depth == 0 => {
                        let para = current_paragraph.unwrap_or_default();
                        let run = run_counter;
                        run_counter += 1;
                        current_run = Some(run);
                        if let Some(ids) = run_anchors.get(&(para, run)) {
                            for &id in ids {
                                write_range_start(&mut writer, id)?;
                            }
                        }
                    }
                    b"w:drawing" | b"w:pict" => drawing_depth += 1,
                    _ => {}
                }
                write_event(&mut writer, Event::Start(e).into_owned())?;
            }
            Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"w:p" if in_body && drawing_depth == 0 => {
                        paragraph_counter += 1;
                        if let Some(ids) = end_anchors.get(&paragraph_counter) {
                            // A self-closed paragraph cannot hold markers;
                            // expand it.
                            write_event(&mut writer, Event::Start(e).into_owned())?;
                            for &id in ids {
                                write_range_start(&mut writer, id)?;
                                write_range_end_and_reference(&mut writer, id)?;
                            }
                            write_event(
                                &mut writer,
                                Event::End(BytesEnd::new("w:p")),
                            )?;
                        } else {
                            write_event(&mut writer, Event::Empty(e).into_owned())?;
                        }
                        buf.clear();
                        continue;
                    }
                    b"w:r" if current_paragraph.is_some() && drawing_depth == 0 => {
                        let para = current_paragraph.unwrap_or_default();
                        let run = run_counter;
                        run_counter += 1;
                        if let Some(ids) = run_anchors.get(&(para, run)) {
                            for &id in ids {
                                write_range_start(&mut writer, id)?;
                            }
                            write_event(&mut writer, Event::Empty(e).into_owned())?;
                            for &id in ids {
                                write_range_end_and_reference(&mut writer, id)?;
                            }
                            buf.clear();
                            continue;
                        }
                    }
                    _ => {}
                }
                write_event(&mut writer, Event::Empty(e).into_owned())?;
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"w:r" if drawing_depth == 0 && current_run.is_some() => {
                        write_event(&mut writer, Event::End(e).into_owned())?;
                        let para = current_paragraph.unwrap_or_default();
                        let run = current_run.take().unwrap_or_default();
                        if let Some(ids) = run_anchors.get(&(para, run)) {
                            for &id in ids {
                                write_range_end_and_reference(&mut writer, id)?;
                            }
                        }
                        buf.clear();
                        continue;
                    }
                    b"w:p" if drawing_depth == 0 && current_paragraph.is_some() => {
                        let para = current_paragraph.take().unwrap_or_default();
                        if let Some(ids) = end_anchors.get(&para) {
                            for &id in ids {
                                write_range_start(&mut writer, id)?;
                                write_range_end_and_reference(&mut writer, id)?;
                            }
                        }
                    }
                    b"w:drawing" | b"w:pict" => {
                        drawing_depth = drawing_depth.saturating_sub(1);
                    }
                    b"w:body" => in_body = false,
                    _ => {}
                }
                write_event(&mut writer, Event::End(e).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                write_event(&mut writer, event.into_owned())?;
            }
            Err(e) => return Err(xml_err(e)),
        }
        buf.clear();
    }

    Ok(writer.into_inner().into_inner())
}

/// Generate `word/comments.xml` for the pending comments.
fn build_comments_xml(pending: &[PendingComment], author: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("w:comments");
    root.push_attribute(("xmlns:w", WORDML_NS));
    write_event(&mut writer, Event::Start(root))?;

    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let initials = author_initials(author);
    for comment in pending {
        let id = comment.id.to_string();
        let mut elem = BytesStart::new("w:comment");
        elem.push_attribute(("w:id", id.as_str()));
        elem.push_attribute(("w:author", author));
        elem.push_attribute(("w:date", date.as_str()));
        elem.push_attribute(("w:initials", initials.as_str()));
        write_event(&mut writer, Event::Start(elem))?;

        write_event(&mut writer, Event::Start(BytesStart::new("w:p")))?;
        write_event(&mut writer, Event::Start(BytesStart::new("w:r")))?;
        let mut text_elem = BytesStart::new("w:t");
        text_elem.push_attribute(("xml:space", "preserve"));
        write_event(&mut writer, Event::Start(text_elem))?;
        write_event(&mut writer, Event::Text(BytesText::new(&comment.text)))?;
        write_event(&mut writer, Event::End(BytesEnd::new("w:t")))?;
        write_event(&mut writer, Event::End(BytesEnd::new("w:r")))?;
        write_event(&mut writer, Event::End(BytesEnd::new("w:p")))?;

        write_event(&mut writer, Event::End(BytesEnd::new("w:comment")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("w:comments")))?;
    Ok(writer.into_inner().into_inner())
}

fn author_initials(author: &str) -> String {
    author
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Add the comments content-type override unless one is already declared.
fn patch_content_types(xml: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut buf = Vec::new();
    let mut already_declared = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"Override" => {
                if get_attr(&e, b"PartName").as_deref() == Some("/word/comments.xml") {
                    already_declared = true;
                }
                write_event(&mut writer, Event::Empty(e).into_owned())?;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Types" => {
                if !already_declared {
                    let mut elem = BytesStart::new("Override");
                    elem.push_attribute(("PartName", "/word/comments.xml"));
                    elem.push_attribute(("ContentType", COMMENTS_CONTENT_TYPE));
                    write_event(&mut writer, Event::Empty(elem))?;
                }
                write_event(&mut writer, Event::End(e).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => write_event(&mut writer, event.into_owned())?,
            Err(e) => return Err(xml_err(e)),
        }
        buf.clear();
    }

    Ok(writer.into_inner().into_inner())
}

/// Add the comments relationship unless one is already declared.
fn patch_relationships(xml: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut buf = Vec::new();
    let mut already_declared = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                if get_attr(&e, b"Type").as_deref() == Some(COMMENTS_REL_TYPE) {
                    already_declared = true;
                }
                write_event(&mut writer, Event::Empty(e).into_owned())?;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Relationships" => {
                if !already_declared {
                    write_event(&mut writer, Event::Empty(comments_relationship()))?;
                }
                write_event(&mut writer, Event::End(e).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => write_event(&mut writer, event.into_owned())?,
            Err(e) => return Err(xml_err(e)),
        }
        buf.clear();
    }

    Ok(writer.into_inner().into_inner())
}

fn comments_relationship() -> BytesStart<'static> {
    let mut elem = BytesStart::new("Relationship");
    elem.push_attribute(("Id", "rIdRedlineComments"));
    elem.push_attribute(("Type", COMMENTS_REL_TYPE));
    elem.push_attribute(("Target", "comments.xml"));
    elem
}

fn minimal_relationships() -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    let mut root = BytesStart::new("Relationships");
    root.push_attribute((
        "xmlns",
        "http://schemas.openxmlformats.org/package/2006/relationships",
    ));
    write_event(&mut writer, Event::Start(root))?;
    write_event(&mut writer, Event::Empty(comments_relationship()))?;
    write_event(&mut writer, Event::End(BytesEnd::new("Relationships")))?;
    Ok(writer.into_inner().into_inner())
}

/// Extract an attribute value by key from an element.
#[inline]
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
