//! Redline CLI - check a DOCX document against academic formatting rules.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;
use redline_core::ValidationProfile;
use redline_grammar::LanguageToolClient;
use redline_rules::{ValidationReport, Validator};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "redline",
    version,
    about = "Validate DOCX documents against academic formatting rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a document and report findings
    Check {
        /// Path to the .docx file
        file: PathBuf,

        /// Validation profile as a TOML file (defaults are used when omitted)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Comma-separated rule names to run (all rules when omitted)
        #[arg(long, value_delimiter = ',')]
        rules: Option<Vec<String>>,

        /// Write a copy of the document with one review comment per finding
        #[arg(long)]
        annotate: Option<PathBuf>,

        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Skip the grammar rule even if the profile enables it
        #[arg(long)]
        no_grammar: bool,
    },

    /// List the registered rules
    Rules,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            file,
            profile,
            rules,
            annotate,
            json,
            no_grammar,
        } => check(&file, profile.as_deref(), rules, annotate, json, no_grammar).await,
        Command::Rules => {
            for name in Validator::new().rule_names() {
                println!("{name}");
            }
            println!("Grammar");
            Ok(())
        }
    }
}

async fn check(
    file: &Path,
    profile_path: Option<&Path>,
    rules: Option<Vec<String>>,
    annotate: Option<PathBuf>,
    json: bool,
    no_grammar: bool,
) -> Result<()> {
    if file.extension().and_then(|e| e.to_str()) != Some("docx") {
        bail!("expected a .docx file: {}", file.display());
    }

    let mut profile = load_profile(profile_path)?;
    if no_grammar {
        profile.check_grammar = false;
    }

    let bytes = std::fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let validator = if profile.check_grammar {
        let client = LanguageToolClient::from_env()?;
        info!("grammar checks via {}", client.base_url());
        Validator::with_grammar(Arc::new(client))
    } else {
        Validator::new()
    };

    let selected = rules.as_deref();
    let report = if let Some(output) = annotate {
        let (report, annotated) = validator
            .validate_with_comments(&bytes, &profile, selected)
            .await?;
        std::fs::write(&output, annotated)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Annotated document written to {}", output.display());
        report
    } else {
        validator.validate(&bytes, &profile, selected).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.error_count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_profile(path: Option<&Path>) -> Result<ValidationProfile> {
    let Some(path) = path else {
        return Ok(ValidationProfile::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("invalid profile {}", path.display()))
}

fn print_report(report: &ValidationReport) {
    if !report.headings.is_empty() {
        println!("{}", "Document outline".bold());
        for heading in &report.headings {
            let indent = "  ".repeat(usize::from(heading.level));
            println!("{indent}{} {}", format!("H{}", heading.level).dimmed(), heading.text);
        }
        println!();
    }

    for finding in &report.findings {
        let severity = if finding.is_error {
            "error".red().bold()
        } else {
            "warning".yellow().bold()
        };
        let mut location = finding.location.describe();
        if !finding.location.section.is_empty() {
            location = format!("{location}, section \"{}\"", finding.location.section);
        }
        println!(
            "{severity} {} [{}]\n    {}",
            finding.rule.cyan(),
            location.dimmed(),
            finding.message
        );
    }

    let summary = format!(
        "{} errors, {} warnings",
        report.error_count(),
        report.warning_count()
    );
    if report.error_count() == 0 {
        println!("\n{} {summary}", "OK".green().bold());
    } else {
        println!("\n{} {summary}", "FAIL".red().bold());
    }
}
