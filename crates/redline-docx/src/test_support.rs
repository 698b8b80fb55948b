//! Helpers for building minimal in-memory DOCX packages in tests.
//!
//! Production code never uses this module; it exists so unit and integration
//! tests across the workspace can construct valid little packages without
//! fixture files.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Opening of a minimal `word/document.xml`, up to and including `<w:body>`.
pub const DOC_PREFIX: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>"#;

/// Closing of a minimal `word/document.xml`.
pub const DOC_SUFFIX: &str = "<w:sectPr/></w:body></w:document>";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

/// Build a ZIP archive from `(name, content)` entries.
#[must_use]
pub fn zip_with_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(content.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Build a minimal DOCX package around the given `word/document.xml` content
/// and optional `word/styles.xml`.
#[must_use]
pub fn docx_bytes(document_xml: &str, styles_xml: Option<&str>) -> Vec<u8> {
    let mut entries = vec![
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/document.xml", document_xml),
    ];
    if let Some(styles) = styles_xml {
        entries.push(("word/styles.xml", styles));
    }
    zip_with_entries(&entries)
}

/// Wrap body inner XML in the document prefix/suffix and build a package.
#[must_use]
pub fn docx_with_body(body_inner: &str) -> Vec<u8> {
    docx_bytes(&format!("{DOC_PREFIX}{body_inner}{DOC_SUFFIX}"), None)
}

/// Wrap body inner XML and include a styles part.
#[must_use]
pub fn docx_with_body_and_styles(body_inner: &str, styles_xml: &str) -> Vec<u8> {
    docx_bytes(
        &format!("{DOC_PREFIX}{body_inner}{DOC_SUFFIX}"),
        Some(styles_xml),
    )
}
