//! Result reporting: console, JSON, and CSV renderings of cloak outcomes.
//!
//! The core returns structured results and typed errors; everything
//! presentation-related lives here and in the binary, never in the
//! application layer.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::domain::values::{CloakOutcome, CloakRequest};
use crate::error::CloakError;

/// Supported output renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Console
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Console => "console",
            Self::Json => "json",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "unknown output format '{other}' (expected console, json, or csv)"
            )),
        }
    }
}

/// Flattened, serializable record of one processed cloak request.
#[derive(Debug, Clone, Serialize)]
pub struct CloakReport {
    pub original_url: String,
    pub domain: String,
    pub keyword: String,
    pub masked_urls: Vec<String>,
    pub failures: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl CloakReport {
    /// Builds a report from a successful (possibly partial) outcome.
    pub fn from_outcome(request: &CloakRequest, outcome: &CloakOutcome) -> Self {
        Self {
            original_url: request.target.to_string(),
            domain: request.domain.to_string(),
            keyword: request.keyword.to_string(),
            masked_urls: outcome
                .masked_urls
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            failures: outcome.failures.iter().map(|f| f.to_string()).collect(),
            generated_at: Utc::now(),
        }
    }

    /// Builds a report for a request on which every backend failed.
    pub fn from_failure(request: &CloakRequest, error: &CloakError) -> Self {
        Self {
            original_url: request.target.to_string(),
            domain: request.domain.to_string(),
            keyword: request.keyword.to_string(),
            masked_urls: Vec::new(),
            failures: error.failures().iter().map(|f| f.to_string()).collect(),
            generated_at: Utc::now(),
        }
    }
}

/// Renders reports in the selected format and writes them to stdout or a
/// file.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders all reports into a single string.
    ///
    /// # Errors
    ///
    /// Fails only on JSON serialization problems.
    pub fn render(&self, reports: &[CloakReport]) -> Result<String> {
        match self.format {
            OutputFormat::Console => Ok(render_console(reports)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(reports).context("Failed to serialize reports to JSON")
            }
            OutputFormat::Csv => Ok(render_csv(reports)),
        }
    }

    /// Renders the reports and emits them to `output_file`, or stdout when
    /// no file is given.
    ///
    /// # Errors
    ///
    /// Fails when rendering fails or the output file cannot be written.
    pub fn emit(&self, reports: &[CloakReport], output_file: Option<&Path>) -> Result<()> {
        let rendered = self.render(reports)?;

        match output_file {
            Some(path) => {
                fs::write(path, rendered.as_bytes())
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                tracing::info!(path = %path.display(), format = %self.format, "wrote results");
            }
            None => println!("{rendered}"),
        }

        Ok(())
    }
}

fn render_console(reports: &[CloakReport]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (i, report) in reports.iter().enumerate() {
        if reports.len() > 1 {
            lines.push(format!("{}", format!("=== Result {} ===", i + 1).cyan()));
        }

        lines.push(format!("{} {}", "Original URL:".cyan(), report.original_url));
        lines.push(format!("{} {}", "Domain:".cyan(), report.domain));
        lines.push(format!("{} {}", "Keyword:".cyan(), report.keyword));

        if report.masked_urls.is_empty() {
            lines.push(format!("{}", "[x] No masked links produced".red()));
        } else {
            lines.push(format!(
                "{}",
                format!("[+] Generated {} masked link(s):", report.masked_urls.len()).green()
            ));
            for (n, masked) in report.masked_urls.iter().enumerate() {
                lines.push(format!("{} {}", format!("  Link {}:", n + 1).cyan(), masked));
            }
        }

        for failure in &report.failures {
            lines.push(format!("{} {}", "[!] Failed:".yellow(), failure));
        }

        if i + 1 < reports.len() {
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

const CSV_HEADER: &str = "original_url,domain,keyword,masked_url,generated_at";

fn render_csv(reports: &[CloakReport]) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];

    for report in reports {
        let timestamp = report.generated_at.to_rfc3339();
        for masked in &report.masked_urls {
            lines.push(
                [
                    csv_field(&report.original_url),
                    csv_field(&report.domain),
                    csv_field(&report.keyword),
                    csv_field(masked),
                    csv_field(&timestamp),
                ]
                .join(","),
            );
        }
    }

    lines.join("\n")
}

/// Quotes a CSV field only when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::{
        DEFAULT_MAX_KEYWORD_LENGTH, DisguiseDomain, Keyword, MaskedUrl, TargetUrl,
    };
    use crate::error::{BackendError, BackendErrorKind};

    fn sample_report() -> CloakReport {
        let request = CloakRequest::new(
            TargetUrl::parse("https://example.com/path?q=1").unwrap(),
            DisguiseDomain::parse("google.com").unwrap(),
            Keyword::parse("verify", DEFAULT_MAX_KEYWORD_LENGTH).unwrap(),
        );
        let outcome = CloakOutcome {
            masked_urls: vec![MaskedUrl::new(
                "https://google.com-verify@tinyurl.com/zz9".to_string(),
            )],
            failures: vec![BackendError::new("dagd", BackendErrorKind::Timeout)],
        };
        CloakReport::from_outcome(&request, &outcome)
    }

    #[test]
    fn test_output_format_round_trips_from_str() {
        assert_eq!("console".parse::<OutputFormat>().unwrap(), OutputFormat::Console);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_render_contains_all_fields() {
        let rendered = OutputFormatter::new(OutputFormat::Json)
            .render(&[sample_report()])
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let entry = &parsed[0];

        assert_eq!(entry["original_url"], "https://example.com/path?q=1");
        assert_eq!(entry["domain"], "google.com");
        assert_eq!(entry["keyword"], "verify");
        assert_eq!(
            entry["masked_urls"][0],
            "https://google.com-verify@tinyurl.com/zz9"
        );
        assert!(entry["failures"][0].as_str().unwrap().contains("dagd"));
    }

    #[test]
    fn test_csv_render_one_row_per_masked_url() {
        let rendered = OutputFormatter::new(OutputFormat::Csv)
            .render(&[sample_report()])
            .unwrap();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("https://example.com/path?q=1,google.com,verify,"));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_console_render_lists_links_and_failures() {
        colored::control::set_override(false);

        let rendered = OutputFormatter::new(OutputFormat::Console)
            .render(&[sample_report()])
            .unwrap();

        assert!(rendered.contains("Original URL: https://example.com/path?q=1"));
        assert!(rendered.contains("Link 1: https://google.com-verify@tinyurl.com/zz9"));
        assert!(rendered.contains("[!] Failed: dagd: request timed out"));

        colored::control::unset_override();
    }
}
