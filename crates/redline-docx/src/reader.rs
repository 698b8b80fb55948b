//! DOCX package reader.
//!
//! A DOCX file is a ZIP archive; the validator needs two parts of it:
//! - `word/document.xml`: body content (paragraphs, runs, tables)
//! - `word/styles.xml`: style definitions and document defaults
//!
//! Parsing is a manual quick-xml event walk with location flags. Paragraph
//! indices are assigned globally in document order (table-cell paragraphs
//! included) so that every consumer agrees on paragraph numbering; the
//! comment writer in [`crate::comments`] counts the same way when it
//! re-serializes the package.
//!
//! Content nested inside drawings (text boxes) is not body text and is
//! skipped entirely; the drawing itself is recorded as run content so the
//! figure rules can find image paragraphs.

use crate::document::{
    Block, BlockFormat, Body, DocxDocument, Indentation, Justification, LineRule, Numbering,
    Paragraph, Run, RunContent, RunProperties, Spacing, SpacingValue, Style, StyleCatalog,
    StyleType, Table,
};
use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use redline_core::{RedlineError, Result};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Parse a DOCX document from raw bytes.
///
/// # Errors
/// Returns an error when the input is not a readable ZIP archive, when
/// `word/document.xml` is missing, or when a part fails to parse as XML.
/// A missing `word/styles.xml` is not an error (empty catalog).
pub fn parse_bytes(data: &[u8]) -> Result<DocxDocument> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| RedlineError::Archive(format!("failed to open DOCX as ZIP: {e}")))?;

    let styles = match read_entry(&mut archive, "word/styles.xml")? {
        Some(xml) => parse_styles_xml(&xml)?,
        None => StyleCatalog::new(),
    };

    let Some(document_xml) = read_entry(&mut archive, "word/document.xml")? else {
        return Err(RedlineError::Document(
            "missing word/document.xml".to_string(),
        ));
    };
    let body = parse_document_xml(&document_xml)?;

    let default_count = styles.default_paragraph_style_count();
    if default_count > 1 {
        warn!("style catalog marks {default_count} paragraph styles as default; first one wins");
    }

    Ok(DocxDocument { body, styles })
}

/// Parse a DOCX document from a file path.
///
/// # Errors
/// Returns an error if reading the file or parsing its content fails.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DocxDocument> {
    let data = std::fs::read(path.as_ref())?;
    parse_bytes(&data)
}

/// Read a named archive entry as a UTF-8 string; `Ok(None)` when absent.
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(RedlineError::Archive(e.to_string())),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

// ------------------------------------------------------------------------
// XML attribute helpers
// ------------------------------------------------------------------------

/// Extract an attribute value by key from an element.
#[inline]
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract an attribute value by key and parse as i32.
#[inline]
fn get_attr_i32(e: &BytesStart, key: &[u8]) -> Option<i32> {
    get_attr(e, key).and_then(|s| s.parse().ok())
}

/// Interpret a toggle element (`w:b`, `w:default`): absent `w:val` means on;
/// "0" and "false" mean off.
#[inline]
fn toggle_on(e: &BytesStart) -> bool {
    match get_attr(e, b"w:val") {
        None => true,
        Some(v) => v != "0" && v != "false",
    }
}

/// Parse a `w:ind` element into an [`Indentation`].
fn parse_indentation(e: &BytesStart) -> Indentation {
    Indentation {
        left: get_attr_i32(e, b"w:left").or_else(|| get_attr_i32(e, b"w:start")),
        first_line: get_attr_i32(e, b"w:firstLine"),
        hanging: get_attr_i32(e, b"w:hanging"),
        first_line_chars: get_attr_i32(e, b"w:firstLineChars"),
    }
}

/// Parse a `w:spacing` element into a [`Spacing`].
fn parse_spacing(e: &BytesStart) -> Spacing {
    Spacing {
        before: get_attr(e, b"w:before").map(|v| SpacingValue::parse(&v)),
        after: get_attr(e, b"w:after").map(|v| SpacingValue::parse(&v)),
        line: get_attr_i32(e, b"w:line"),
        line_rule: get_attr(e, b"w:lineRule").and_then(|v| LineRule::parse(&v)),
    }
}

// ------------------------------------------------------------------------
// document.xml
// ------------------------------------------------------------------------

/// State container for walking `word/document.xml`.
struct BodyWalker {
    body: Body,
    current_table: Option<Table>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
    paragraph_counter: usize,

    in_body: bool,
    in_p_pr: bool,
    in_num_pr: bool,
    in_r_pr: bool,
    in_text: bool,
    in_instr: bool,
    instr_buf: String,
    table_depth: usize,
    drawing_depth: usize,
}

impl BodyWalker {
    fn new() -> Self {
        Self {
            body: Body::default(),
            current_table: None,
            paragraph: None,
            run: None,
            paragraph_counter: 0,
            in_body: false,
            in_p_pr: false,
            in_num_pr: false,
            in_r_pr: false,
            in_text: false,
            in_instr: false,
            instr_buf: String::new(),
            table_depth: 0,
            drawing_depth: 0,
        }
    }

    fn handle_start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:body" => self.in_body = true,
            b"w:tbl" if self.in_body && self.drawing_depth == 0 => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.current_table = Some(Table::default());
                }
            }
            b"w:p" if self.in_body && self.drawing_depth == 0 => {
                self.paragraph = Some(Paragraph::default());
            }
            b"w:pPr" if self.paragraph.is_some() && self.drawing_depth == 0 => {
                self.in_p_pr = true;
            }
            b"w:numPr" if self.in_p_pr => {
                self.in_num_pr = true;
                if let Some(para) = self.paragraph.as_mut() {
                    para.properties.numbering.get_or_insert(Numbering::default());
                }
            }
            b"w:r" if self.paragraph.is_some()
                && !self.in_p_pr
                && self.run.is_none()
                && self.drawing_depth == 0 =>
            {
                self.run = Some(Run::default());
            }
            b"w:rPr" if self.run.is_some() && !self.in_p_pr => self.in_r_pr = true,
            b"w:t" if self.run.is_some() && self.drawing_depth == 0 && !self.in_r_pr => {
                self.in_text = true;
            }
            b"w:instrText" if self.run.is_some() && self.drawing_depth == 0 => {
                self.in_instr = true;
                self.instr_buf.clear();
            }
            b"w:drawing" | b"w:pict" => {
                if let Some(run) = self.run.as_mut() {
                    if self.drawing_depth == 0 {
                        run.content.push(RunContent::Drawing);
                    }
                }
                self.drawing_depth += 1;
            }
            b"w:fldSimple" if self.paragraph.is_some() && self.drawing_depth == 0 => {
                if let Some(instr) = get_attr(e, b"w:instr") {
                    if let Some(para) = self.paragraph.as_mut() {
                        para.field_codes.push(instr);
                    }
                }
            }
            _ => self.handle_property_element(e),
        }
    }

    fn handle_empty(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            // A self-closing <w:p/> is an empty paragraph and still counts.
            b"w:p" if self.in_body && self.drawing_depth == 0 => {
                self.paragraph = Some(Paragraph::default());
                self.finish_paragraph();
            }
            b"w:drawing" | b"w:pict" => {
                if let Some(run) = self.run.as_mut() {
                    if self.drawing_depth == 0 {
                        run.content.push(RunContent::Drawing);
                    }
                }
            }
            b"w:fldSimple" if self.paragraph.is_some() && self.drawing_depth == 0 => {
                if let Some(instr) = get_attr(e, b"w:instr") {
                    if let Some(para) = self.paragraph.as_mut() {
                        para.field_codes.push(instr);
                    }
                }
            }
            _ => self.handle_property_element(e),
        }
    }

    /// Property and inline-content elements that carry everything in
    /// attributes. These usually arrive as `Empty` events but authoring
    /// tools sometimes emit them as `Start`/`End` pairs, so both event
    /// handlers route here.
    fn handle_property_element(&mut self, e: &BytesStart) {
        if self.drawing_depth > 0 {
            return;
        }
        match e.name().as_ref() {
            b"w:pStyle" if self.in_p_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.properties.style_id = get_attr(e, b"w:val");
                }
            }
            b"w:jc" if self.in_p_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.properties.format.justification =
                        get_attr(e, b"w:val").and_then(|v| Justification::parse(&v));
                }
            }
            b"w:ind" if self.in_p_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.properties.format.indentation = Some(parse_indentation(e));
                }
            }
            b"w:spacing" if self.in_p_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.properties.format.spacing = Some(parse_spacing(e));
                }
            }
            b"w:numId" if self.in_num_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    if let Some(numbering) = para.properties.numbering.as_mut() {
                        numbering.num_id = get_attr_i32(e, b"w:val");
                    }
                }
            }
            b"w:ilvl" if self.in_num_pr => {
                if let Some(para) = self.paragraph.as_mut() {
                    if let Some(numbering) = para.properties.numbering.as_mut() {
                        numbering.level = get_attr_i32(e, b"w:val");
                    }
                }
            }
            b"w:rFonts" if self.in_r_pr => {
                if let Some(run) = self.run.as_mut() {
                    run.properties.font = get_attr(e, b"w:ascii");
                }
            }
            b"w:sz" if self.in_r_pr => {
                if let Some(run) = self.run.as_mut() {
                    run.properties.size_half_pt =
                        get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                }
            }
            b"w:b" if self.in_r_pr => {
                if let Some(run) = self.run.as_mut() {
                    run.properties.bold = Some(toggle_on(e));
                }
            }
            b"w:tab" if self.run.is_some() && !self.in_p_pr && !self.in_r_pr => {
                if let Some(run) = self.run.as_mut() {
                    run.content.push(RunContent::Tab);
                }
            }
            b"w:br" if self.run.is_some() && !self.in_p_pr && !self.in_r_pr => {
                if let Some(run) = self.run.as_mut() {
                    run.content.push(RunContent::Break);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_instr {
            self.instr_buf.push_str(text);
        } else if self.in_text {
            if let Some(run) = self.run.as_mut() {
                // Merge adjacent fragments so offsets line up with what a
                // reader of the paragraph text expects.
                if let Some(RunContent::Text(existing)) = run.content.last_mut() {
                    existing.push_str(text);
                } else {
                    run.content.push(RunContent::Text(text.to_string()));
                }
            }
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"w:t" => self.in_text = false,
            b"w:instrText" if self.in_instr => {
                self.in_instr = false;
                let instr = std::mem::take(&mut self.instr_buf);
                if let Some(para) = self.paragraph.as_mut() {
                    para.field_codes.push(instr);
                }
            }
            b"w:rPr" if self.in_r_pr => self.in_r_pr = false,
            b"w:r" if self.drawing_depth == 0 => {
                if let (Some(run), Some(para)) = (self.run.take(), self.paragraph.as_mut()) {
                    para.runs.push(run);
                }
            }
            b"w:pPr" => {
                self.in_p_pr = false;
                self.in_num_pr = false;
            }
            b"w:numPr" => self.in_num_pr = false,
            b"w:p" if self.drawing_depth == 0 => self.finish_paragraph(),
            b"w:tbl" if self.drawing_depth == 0 && self.table_depth > 0 => {
                self.table_depth -= 1;
                if self.table_depth == 0 {
                    if let Some(table) = self.current_table.take() {
                        self.body.blocks.push(Block::Table(table));
                    }
                }
            }
            b"w:drawing" | b"w:pict" => {
                self.drawing_depth = self.drawing_depth.saturating_sub(1);
            }
            b"w:body" => self.in_body = false,
            _ => {}
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(mut para) = self.paragraph.take() else {
            return;
        };
        self.paragraph_counter += 1;
        para.index = self.paragraph_counter;

        if let Some(table) = self.current_table.as_mut() {
            table.paragraphs.push(para);
        } else {
            self.body.blocks.push(Block::Paragraph(para));
        }
    }
}

/// Parse `word/document.xml` into a [`Body`].
fn parse_document_xml(xml: &str) -> Result<Body> {
    let mut walker = BodyWalker::new();

    let mut reader = Reader::from_str(xml);
    // DOCX marks significant whitespace with xml:space="preserve"; never trim.
    reader.trim_text(false);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => walker.handle_start(&e),
            Ok(Event::Empty(e)) => walker.handle_empty(&e),
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default();
                walker.handle_text(&text);
            }
            Ok(Event::End(e)) => walker.handle_end(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RedlineError::Xml(format!(
                    "error parsing document.xml: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.body)
}

// ------------------------------------------------------------------------
// styles.xml
// ------------------------------------------------------------------------

/// State container for walking `word/styles.xml`.
struct StylesWalker {
    catalog: StyleCatalog,
    style: Option<Style>,
    in_p_pr: bool,
    in_r_pr: bool,
    in_doc_defaults: bool,
    in_p_pr_default: bool,
    in_r_pr_default: bool,
}

impl StylesWalker {
    fn new() -> Self {
        Self {
            catalog: StyleCatalog::new(),
            style: None,
            in_p_pr: false,
            in_r_pr: false,
            in_doc_defaults: false,
            in_p_pr_default: false,
            in_r_pr_default: false,
        }
    }

    fn handle_start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:docDefaults" => self.in_doc_defaults = true,
            b"w:pPrDefault" if self.in_doc_defaults => self.in_p_pr_default = true,
            b"w:rPrDefault" if self.in_doc_defaults => self.in_r_pr_default = true,
            b"w:style" => {
                self.style = Some(Style {
                    id: get_attr(e, b"w:styleId").unwrap_or_default(),
                    style_type: get_attr(e, b"w:type")
                        .map_or(StyleType::Paragraph, |t| StyleType::parse(&t)),
                    is_default: get_attr(e, b"w:default")
                        .is_some_and(|v| v == "1" || v == "true"),
                    ..Style::default()
                });
            }
            b"w:pPr" => self.in_p_pr = true,
            b"w:rPr" => self.in_r_pr = true,
            _ => self.handle_property_element(e),
        }
    }

    fn handle_property_element(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:name" => {
                if let Some(style) = self.style.as_mut() {
                    style.name = get_attr(e, b"w:val");
                }
            }
            b"w:basedOn" => {
                if let Some(style) = self.style.as_mut() {
                    style.based_on = get_attr(e, b"w:val");
                }
            }
            b"w:outlineLvl" if self.in_p_pr => {
                if let Some(style) = self.style.as_mut() {
                    style.outline_level = get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                }
            }
            b"w:jc" if self.in_p_pr => {
                let value = get_attr(e, b"w:val").and_then(|v| Justification::parse(&v));
                if let Some(format) = self.target_format() {
                    format.justification = value;
                }
            }
            b"w:ind" if self.in_p_pr => {
                let value = parse_indentation(e);
                if let Some(format) = self.target_format() {
                    format.indentation = Some(value);
                }
            }
            b"w:spacing" if self.in_p_pr => {
                let value = parse_spacing(e);
                if let Some(format) = self.target_format() {
                    format.spacing = Some(value);
                }
            }
            b"w:rFonts" if self.in_r_pr => {
                let value = get_attr(e, b"w:ascii");
                if let Some(run) = self.target_run() {
                    run.font = value;
                }
            }
            b"w:sz" if self.in_r_pr => {
                let value = get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                if let Some(run) = self.target_run() {
                    run.size_half_pt = value;
                }
            }
            b"w:b" if self.in_r_pr => {
                let value = Some(toggle_on(e));
                if let Some(run) = self.target_run() {
                    run.bold = value;
                }
            }
            _ => {}
        }
    }

    /// The block format the current `w:pPr` contents apply to: the open
    /// style's, or document defaults when inside `w:pPrDefault`.
    fn target_format(&mut self) -> Option<&mut BlockFormat> {
        if let Some(style) = self.style.as_mut() {
            Some(&mut style.format)
        } else if self.in_p_pr_default {
            Some(&mut self.catalog.defaults.format)
        } else {
            None
        }
    }

    /// The run properties the current `w:rPr` contents apply to.
    fn target_run(&mut self) -> Option<&mut RunProperties> {
        if let Some(style) = self.style.as_mut() {
            Some(&mut style.run)
        } else if self.in_r_pr_default {
            Some(&mut self.catalog.defaults.run)
        } else {
            None
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"w:docDefaults" => self.in_doc_defaults = false,
            b"w:pPrDefault" => self.in_p_pr_default = false,
            b"w:rPrDefault" => self.in_r_pr_default = false,
            b"w:pPr" => self.in_p_pr = false,
            b"w:rPr" => self.in_r_pr = false,
            b"w:style" => {
                if let Some(style) = self.style.take() {
                    if !style.id.is_empty() {
                        self.catalog.push(style);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse `word/styles.xml` into a [`StyleCatalog`].
fn parse_styles_xml(xml: &str) -> Result<StyleCatalog> {
    let mut walker = StylesWalker::new();

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => walker.handle_start(&e),
            Ok(Event::Empty(e)) => {
                // Attribute-only elements; same handling as Start for the
                // ones that matter.
                match e.name().as_ref() {
                    b"w:style" => {
                        // Degenerate but legal: style with no children.
                        walker.handle_start(&e);
                        walker.handle_end(b"w:style");
                    }
                    _ => walker.handle_property_element(&e),
                }
            }
            Ok(Event::End(e)) => walker.handle_end(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RedlineError::Xml(format!("error parsing styles.xml: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.catalog)
}
