//! LanguageTool API client.

use crate::types::CheckResponse;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::env;
use std::time::Duration;

/// Default base URL of a locally running LanguageTool server.
const DEFAULT_BASE_URL: &str = "http://localhost:8010";

/// Per-request timeout for text checks.
const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the availability probe; a slow service is treated as down
/// rather than stalling the whole validation run.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Capability interface for grammar checking.
///
/// The grammar rule depends on this trait rather than the concrete client so
/// tests can substitute a scripted service.
#[async_trait]
pub trait GrammarService: Send + Sync {
    /// Check `text` for grammar and spelling issues.
    ///
    /// # Errors
    /// Returns an error on transport failure or an unusable response; the
    /// caller decides how to degrade.
    async fn check_text(&self, text: &str, language: &str) -> Result<CheckResponse>;

    /// Whether the service is reachable. Never errors: any failure means
    /// "not available".
    async fn is_available(&self) -> bool;
}

/// HTTP client for the LanguageTool `/v2` API.
#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LanguageToolClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8010`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Create a client from the `LANGUAGETOOL_URL` environment variable,
    /// falling back to the local default.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("LANGUAGETOOL_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GrammarService for LanguageToolClient {
    async fn check_text(&self, text: &str, language: &str) -> Result<CheckResponse> {
        debug!(
            "checking {} chars against LanguageTool at {}",
            text.chars().count(),
            self.base_url
        );

        let response = self
            .http_client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[
                ("text", text),
                ("language", language),
                ("enabledOnly", "false"),
            ])
            .send()
            .await
            .context("LanguageTool request failed")?
            .error_for_status()
            .context("LanguageTool returned an error status")?;

        response
            .json::<CheckResponse>()
            .await
            .context("Failed to parse LanguageTool response")
    }

    async fn is_available(&self) -> bool {
        let request = self
            .http_client
            .get(format!("{}/v2/languages", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match request {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
