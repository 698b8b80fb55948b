//! Grammar rule: delegate paragraph text to the external grammar service
//! and map its matches to findings.
//!
//! Degradation policy: an unavailable service yields exactly one non-error
//! finding and the rule stops; a transport failure on one paragraph yields
//! one non-error finding for that paragraph and checking continues.

use crate::rule::AsyncRule;
use async_trait::async_trait;
use log::debug;
use redline_core::{truncate_preview, Finding, GrammarIssueKind, Location, ValidationProfile};
use redline_docx::{CommentSink, DocxDocument, Paragraph};
use redline_grammar::{GrammarService, Match};
use std::sync::Arc;

/// See module docs.
pub struct GrammarRule {
    service: Arc<dyn GrammarService>,
}

impl GrammarRule {
    /// Create the rule over a grammar service.
    #[must_use]
    pub fn new(service: Arc<dyn GrammarService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AsyncRule for GrammarRule {
    fn name(&self) -> &'static str {
        "Grammar"
    }

    async fn validate(
        &self,
        doc: &DocxDocument,
        profile: &ValidationProfile,
        sink: Option<&CommentSink>,
    ) -> Vec<Finding> {
        if !profile.check_grammar {
            return Vec::new();
        }

        if !self.service.is_available().await {
            return vec![Finding::warning(
                self.name(),
                "Grammar check skipped: LanguageTool service is not available",
                Location::default(),
            )];
        }

        let mut findings = Vec::new();
        for paragraph in doc.paragraphs() {
            let text = paragraph.text();
            if text.trim().is_empty() {
                continue;
            }

            match self.service.check_text(&text, &profile.language).await {
                Ok(response) => {
                    debug!(
                        "paragraph {}: {} grammar matches",
                        paragraph.index,
                        response.matches.len()
                    );
                    for m in &response.matches {
                        let finding = match_to_finding(self.name(), m, paragraph, &text);
                        if let Some(sink) = sink {
                            sink.comment_at_offset(paragraph, m.offset, m.length, &finding.message);
                        }
                        findings.push(finding);
                    }
                }
                Err(error) => {
                    findings.push(Finding::warning(
                        self.name(),
                        format!(
                            "Grammar check failed for paragraph {}: {error:#}",
                            paragraph.index
                        ),
                        Location::paragraph(paragraph.index),
                    ));
                }
            }
        }

        findings
    }
}

/// Build a finding from one service match.
fn match_to_finding(rule_name: &str, m: &Match, paragraph: &Paragraph, text: &str) -> Finding {
    let chars: Vec<char> = text.chars().collect();
    let start = m.offset.min(chars.len());
    let end = (m.offset + m.length).min(chars.len());
    let error_text: String = chars[start..end].iter().collect();

    let suggestions: Vec<&str> = m
        .replacements
        .iter()
        .take(3)
        .map(|r| r.value.as_str())
        .collect();
    let suggestion_text = if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Suggestions: {}", suggestions.join(", "))
    };

    let (issue_type, category_id) = m
        .rule
        .as_ref()
        .map(|rule| {
            (
                rule.issue_type.as_str(),
                rule.category.as_ref().map_or("", |c| c.id.as_str()),
            )
        })
        .unwrap_or(("", ""));
    let kind = GrammarIssueKind::classify(issue_type, category_id);

    let mut location = Location::run(paragraph.index, 1, m.offset, m.length);
    location.text = truncate_preview(&error_text, 50);

    let message = format!("{kind}: {}{suggestion_text}", m.message);
    if kind.is_error() {
        Finding::error(rule_name, message, location)
    } else {
        Finding::warning(rule_name, message, location)
    }
}
