//! # Redline DOCX - package reader and comment annotator
//!
//! Reads the subset of a DOCX package the formatting rules need and writes
//! review comments back into a copy of the package.
//!
//! # Architecture
//!
//! Manual ZIP + XML parsing (docx-rs is writer-only). A DOCX file is a ZIP
//! archive; the parts touched here:
//!
//! - `word/document.xml`: body content (paragraphs, runs, tables)
//! - `word/styles.xml`: style definitions, `basedOn` links, doc defaults
//! - `word/comments.xml` + content-type/relationship entries: written when
//!   annotating
//!
//! Everything else passes through annotated re-serialization untouched.
//!
//! # Example
//!
//! ```no_run
//! use redline_docx::{parse_file, CommentSink, write_annotated};
//!
//! # fn main() -> redline_core::Result<()> {
//! let doc = parse_file("thesis.docx")?;
//! println!("{} paragraphs", doc.body.paragraph_count());
//!
//! let bytes = std::fs::read("thesis.docx")?;
//! let sink = CommentSink::new();
//! if let Some(first) = doc.paragraphs().next() {
//!     sink.comment_on_paragraph(first, "Check this paragraph");
//! }
//! let annotated = write_annotated(&bytes, &sink)?;
//! std::fs::write("thesis.annotated.docx", annotated)?;
//! # Ok(())
//! # }
//! ```

pub mod comments;
pub mod document;
pub mod reader;
pub mod test_support;

pub use comments::{write_annotated, CommentSink};
pub use document::{
    Block, BlockFormat, Body, DocDefaults, DocxDocument, Indentation, Justification, LineRule,
    Numbering, Paragraph, ParagraphProperties, Run, RunContent, RunProperties, Spacing,
    SpacingValue, Style, StyleCatalog, StyleType, Table,
};
pub use reader::{parse_bytes, parse_file};
