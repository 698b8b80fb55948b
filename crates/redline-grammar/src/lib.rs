//! # Redline Grammar - LanguageTool client
//!
//! HTTP client for a LanguageTool server, used by the grammar rule to check
//! paragraph text for spelling and grammar issues.
//!
//! The client is exposed behind the [`GrammarService`] trait so the rule can
//! run against a scripted service in tests. Transport failures are the
//! caller's concern: the grammar rule downgrades them to warning findings
//! per paragraph rather than aborting a validation run.
//!
//! # Example
//!
//! ```no_run
//! use redline_grammar::{GrammarService, LanguageToolClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = LanguageToolClient::from_env()?;
//! if client.is_available().await {
//!     let response = client.check_text("Thiss is wrong.", "en-US").await?;
//!     for m in response.matches {
//!         println!("{} at {}..{}", m.message, m.offset, m.offset + m.length);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::{GrammarService, LanguageToolClient};
pub use types::{
    CheckResponse, DetectedLanguage, LanguageInfo, Match, MatchContext, MatchRule, Replacement,
    RuleCategory, Software,
};
