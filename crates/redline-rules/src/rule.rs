//! Rule capability traits.
//!
//! Rules come in two kinds: pure synchronous analyzers over the parsed
//! document, and rules with an asynchronous external dependency (currently
//! only the grammar check). The orchestrator runs the synchronous rules
//! first and awaits the asynchronous ones afterwards, in registration order,
//! so the same inputs always produce the same ordered findings.

use async_trait::async_trait;
use redline_core::{Finding, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument};

/// A synchronous validation rule.
///
/// Rules are stateless and order-insensitive: running a subset produces the
/// same findings as running all rules and filtering by name. When a sink is
/// supplied, each finding is also pushed as a review comment anchored to the
/// most specific element available (run, then paragraph, then paragraph
/// end).
pub trait Rule: Send + Sync {
    /// Stable rule name, used for rule selection and carried on findings.
    fn name(&self) -> &'static str;

    /// Run the rule over a parsed document.
    fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding>;
}

/// A validation rule with an asynchronous external dependency.
#[async_trait]
pub trait AsyncRule: Send + Sync {
    /// Stable rule name, used for rule selection and carried on findings.
    fn name(&self) -> &'static str;

    /// Run the rule over a parsed document.
    async fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding>;
}
