//! Error types for document validation operations.

use thiserror::Error;

/// Error types that can occur while opening or validating a document.
///
/// Structural absence inside an otherwise well-formed document (no body, no
/// styles part, paragraphs without runs) is *not* an error: rules treat it as
/// "nothing to validate" and return empty finding sets. These variants cover
/// genuinely fatal conditions that abort a validation run before or while the
/// rules execute.
#[derive(Error, Debug)]
pub enum RedlineError {
    /// I/O failure reading the input document or writing annotated output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a readable ZIP container (corrupt or not a DOCX).
    #[error("archive error: {0}")]
    Archive(String),

    /// A required OOXML part failed to parse.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document is structurally unusable (e.g. missing word/document.xml).
    #[error("document error: {0}")]
    Document(String),

    /// The grammar service returned an unusable response.
    ///
    /// Transport failures during per-paragraph checks are downgraded to
    /// warning findings by the grammar rule and never surface here.
    #[error("grammar service error: {0}")]
    Grammar(String),
}

/// Convenience result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RedlineError>;
