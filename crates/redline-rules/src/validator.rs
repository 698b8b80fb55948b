//! Validation orchestrator.
//!
//! Opens a document, runs the selected rules over it, attaches section
//! context to the findings, and optionally re-serializes the document with
//! review comments. Execution is sequential and in registration order, so
//! the same document, profile and rule selection always produce the same
//! ordered findings.

use crate::headings;
use crate::rule::{AsyncRule, Rule};
use crate::rules::{
    EmptySectionStructureRule, FigureCaptionStyleRule, FontFamilyRule, GrammarRule,
    HeadingStyleUsageRule, HierarchyDepthRule, ListConsistencyRule, LineSpacingDependencyRule,
    NoDotsInTitlesRule, ParagraphIndentRule, ParagraphSpacingRule, SingleSpaceRule,
    TableOfContentsRule, TextJustificationRule,
};
use crate::section::SectionIndex;
use log::{debug, info};
use redline_core::{Finding, HeadingInfo, Result, ValidationProfile};
use redline_docx::{parse_bytes, write_annotated, CommentSink, DocxDocument};
use redline_grammar::GrammarService;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// All findings, in rule registration order, with section context
    /// attached.
    pub findings: Vec<Finding>,
    /// The document's heading outline.
    pub headings: Vec<HeadingInfo>,
}

impl ValidationReport {
    /// Number of error-severity findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error).count()
    }

    /// Number of warning-severity findings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }
}

/// Runs a registered set of rules over documents.
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
    async_rules: Vec<Box<dyn AsyncRule>>,
}

impl Validator {
    /// A validator with every synchronous rule registered and no grammar
    /// service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FontFamilyRule),
                Box::new(ParagraphIndentRule),
                Box::new(ParagraphSpacingRule),
                Box::new(LineSpacingDependencyRule),
                Box::new(TextJustificationRule),
                Box::new(SingleSpaceRule),
                Box::new(ListConsistencyRule),
                Box::new(NoDotsInTitlesRule),
                Box::new(HeadingStyleUsageRule),
                Box::new(EmptySectionStructureRule),
                Box::new(FigureCaptionStyleRule),
                Box::new(HierarchyDepthRule),
                Box::new(TableOfContentsRule),
            ],
            async_rules: Vec::new(),
        }
    }

    /// A validator with the full rule set, grammar checking included.
    #[must_use]
    pub fn with_grammar(service: Arc<dyn GrammarService>) -> Self {
        let mut validator = Self::new();
        validator
            .async_rules
            .push(Box::new(GrammarRule::new(service)));
        validator
    }

    /// Names of all registered rules, in execution order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.name())
            .chain(self.async_rules.iter().map(|r| r.name()))
            .collect()
    }

    /// Validate a document given as raw DOCX bytes.
    ///
    /// `selected_rules` filters by rule name, case-insensitively; `None` or
    /// an empty list runs every registered rule, and unknown names are
    /// silently ignored.
    ///
    /// # Errors
    /// Returns an error when the document cannot be opened; rule execution
    /// itself never fails.
    pub async fn validate(
        &self,
        bytes: &[u8],
        profile: &ValidationProfile,
        selected_rules: Option<&[String]>,
    ) -> Result<ValidationReport> {
        let doc = parse_bytes(bytes)?;
        let findings = self
            .run_rules(&doc, profile, selected_rules, None)
            .await;
        Ok(finish_report(&doc, findings))
    }

    /// Validate and also produce a copy of the document annotated with one
    /// review comment per finding.
    ///
    /// # Errors
    /// Returns an error when the document cannot be opened or the annotated
    /// copy cannot be serialized.
    pub async fn validate_with_comments(
        &self,
        bytes: &[u8],
        profile: &ValidationProfile,
        selected_rules: Option<&[String]>,
    ) -> Result<(ValidationReport, Vec<u8>)> {
        let doc = parse_bytes(bytes)?;
        let sink = CommentSink::new();
        let findings = self
            .run_rules(&doc, profile, selected_rules, Some(&sink))
            .await;
        info!("annotating document with {} comments", sink.len());
        let annotated = write_annotated(bytes, &sink)?;
        Ok((finish_report(&doc, findings), annotated))
    }

    async fn run_rules(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        selected_rules: Option<&[String]>,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        let selection = selection_set(selected_rules);
        let is_selected = |name: &str| {
            selection
                .as_ref()
                .is_none_or(|set| set.contains(&name.to_lowercase()))
        };

        let mut findings = Vec::new();
        for rule in &self.rules {
            if !is_selected(rule.name()) {
                continue;
            }
            let produced = rule.validate(doc, profile, sink);
            debug!("rule {} produced {} findings", rule.name(), produced.len());
            findings.extend(produced);
        }
        for rule in &self.async_rules {
            if !is_selected(rule.name()) {
                continue;
            }
            let produced = rule.validate(doc, profile, sink).await;
            debug!("rule {} produced {} findings", rule.name(), produced.len());
            findings.extend(produced);
        }
        findings
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased selection set; `None` means "run everything".
fn selection_set(selected_rules: Option<&[String]>) -> Option<HashSet<String>> {
    let selected = selected_rules?;
    if selected.is_empty() {
        return None;
    }
    Some(selected.iter().map(|name| name.to_lowercase()).collect())
}

/// Extract the heading outline of a document.
#[must_use]
pub fn extract_headings(doc: &DocxDocument) -> Vec<HeadingInfo> {
    doc.paragraphs()
        .filter_map(|p| {
            let level = headings::heading_level(doc, p)?;
            let text = p.text().trim().to_string();
            (!text.is_empty()).then_some(HeadingInfo { level, text })
        })
        .collect()
}

fn finish_report(doc: &DocxDocument, mut findings: Vec<Finding>) -> ValidationReport {
    SectionIndex::build(doc).annotate(&mut findings);
    ValidationReport {
        findings,
        headings: extract_headings(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_docx::test_support::docx_with_body;

    fn sample_docx() -> Vec<u8> {
        docx_with_body(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
               <w:r><w:t>Chapter 1</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Body  with double space</w:t></w:r></w:p>",
        )
    }

    #[tokio::test]
    async fn test_validate_produces_findings_and_headings() {
        let validator = Validator::new();
        let report = validator
            .validate(&sample_docx(), &ValidationProfile::default(), None)
            .await
            .unwrap();

        assert!(!report.findings.is_empty());
        assert_eq!(report.headings.len(), 1);
        assert_eq!(report.headings[0].level, 1);
        assert_eq!(report.headings[0].text, "Chapter 1");
    }

    #[tokio::test]
    async fn test_rule_selection_is_case_insensitive_and_lenient() {
        let validator = Validator::new();
        let selection = vec![
            "singlespacerule".to_string(),
            "NoSuchRule".to_string(),
        ];
        let report = validator
            .validate(
                &sample_docx(),
                &ValidationProfile::default(),
                Some(&selection),
            )
            .await
            .unwrap();

        assert!(!report.findings.is_empty());
        assert!(report
            .findings
            .iter()
            .all(|f| f.rule == "SingleSpaceRule"));
    }

    #[tokio::test]
    async fn test_empty_selection_runs_all_rules() {
        let validator = Validator::new();
        let all = validator
            .validate(&sample_docx(), &ValidationProfile::default(), None)
            .await
            .unwrap();
        let empty_selection: Vec<String> = vec![];
        let with_empty = validator
            .validate(
                &sample_docx(),
                &ValidationProfile::default(),
                Some(&empty_selection),
            )
            .await
            .unwrap();

        assert_eq!(all.findings, with_empty.findings);
    }

    #[tokio::test]
    async fn test_subset_equals_filtered_full_run() {
        let validator = Validator::new();
        let profile = ValidationProfile::default();
        let full = validator
            .validate(&sample_docx(), &profile, None)
            .await
            .unwrap();
        let selection = vec!["TextJustificationRule".to_string()];
        let subset = validator
            .validate(&sample_docx(), &profile, Some(&selection))
            .await
            .unwrap();

        let filtered: Vec<_> = full
            .findings
            .into_iter()
            .filter(|f| f.rule == "TextJustificationRule")
            .collect();
        assert_eq!(subset.findings, filtered);
    }

    #[tokio::test]
    async fn test_determinism() {
        let validator = Validator::new();
        let profile = ValidationProfile::default();
        let first = validator
            .validate(&sample_docx(), &profile, None)
            .await
            .unwrap();
        let second = validator
            .validate(&sample_docx(), &profile, None)
            .await
            .unwrap();
        assert_eq!(first.findings, second.findings);
    }

    #[tokio::test]
    async fn test_section_context_attached() {
        let validator = Validator::new();
        let report = validator
            .validate(&sample_docx(), &ValidationProfile::default(), None)
            .await
            .unwrap();

        let double_space = report
            .findings
            .iter()
            .find(|f| f.rule == "SingleSpaceRule")
            .unwrap();
        assert_eq!(double_space.location.section, "Chapter 1");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_fatal() {
        let validator = Validator::new();
        let result = validator
            .validate(b"not a docx", &ValidationProfile::default(), None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_validate_with_comments_returns_annotated_bytes() {
        let validator = Validator::new();
        let (report, annotated) = validator
            .validate_with_comments(&sample_docx(), &ValidationProfile::default(), None)
            .await
            .unwrap();

        assert!(!report.findings.is_empty());
        // The annotated output must still be a parseable package.
        let reparsed = redline_docx::parse_bytes(&annotated).unwrap();
        assert_eq!(reparsed.body.paragraph_count(), 2);
    }

    #[test]
    fn test_rule_names_are_unique() {
        let validator = Validator::new();
        let names = validator.rule_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 13);
    }
}
