//! # Redline Rules - the formatting rule engine
//!
//! Validates a parsed DOCX document against a set of academic formatting
//! rules and reports findings with document locations.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Validator                           │
//! │  (opens document, selects + runs rules, attaches section   │
//! │   context, drives the optional comment sink)               │
//! └────────────────────────────────────────────────────────────┘
//!           │                                    │
//!           ▼                                    ▼
//! ┌───────────────────┐              ┌─────────────────────────┐
//! │  Rule / AsyncRule │              │      SectionIndex       │
//! │  (14 validators)  │              │ (nearest-heading lookup)│
//! └───────────────────┘              └─────────────────────────┘
//!           │
//!           ▼
//! ┌───────────────────┐   ┌──────────────────┐
//! │   StyleResolver   │   │ heading classifier│
//! │ (direct → style → │   │ (locale patterns +│
//! │  basedOn chain →  │   │  outline levels)  │
//! │  default → doc    │   └──────────────────┘
//! │  defaults)        │
//! └───────────────────┘
//! ```
//!
//! Rules are stateless and independent: running a subset produces exactly
//! the findings that running everything and filtering by rule name would.
//! The only asynchronous rule is the grammar check, which talks to a
//! LanguageTool server through [`redline_grammar::GrammarService`].
//!
//! # Example
//!
//! ```no_run
//! use redline_core::ValidationProfile;
//! use redline_rules::Validator;
//!
//! # async fn example() -> redline_core::Result<()> {
//! let bytes = std::fs::read("thesis.docx")?;
//! let validator = Validator::new();
//! let report = validator
//!     .validate(&bytes, &ValidationProfile::default(), None)
//!     .await?;
//!
//! for finding in &report.findings {
//!     println!("[{}] {}: {}", finding.location, finding.rule, finding.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod headings;
pub mod patterns;
pub mod resolve;
pub mod rule;
pub mod rules;
pub mod section;
pub mod validator;

pub use headings::{heading_level, is_heading};
pub use patterns::StyleKind;
pub use resolve::StyleResolver;
pub use rule::{AsyncRule, Rule};
pub use section::SectionIndex;
pub use validator::{extract_headings, ValidationReport, Validator};
