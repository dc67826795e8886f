//! ShadowLink command-line interface.
//!
//! Three ways to drive the cloaking pipeline:
//!
//! ```bash
//! # Single-shot
//! shadowlink https://example.com -d facebook.com -k login
//!
//! # Interactive (prompts for whatever is missing)
//! shadowlink
//!
//! # Batch: one target URL per line, shared domain/keyword
//! shadowlink --batch urls.txt -d facebook.com -k login -f csv -o out.csv
//! ```
//!
//! Validation failures are reported immediately with the specific reason so
//! the user can fix their input; a run where every shortening service
//! failed is reported distinctly so the user knows to retry later instead.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use dialoguer::Input;

use shadowlink::config::{self, ShadowlinkConfig};
use shadowlink::prelude::*;

const BANNER: &str = r"
 ____  _               _               _     _       _
/ ___|| |__   __ _  __| | _____      _| |   (_)_ __ | | __
\___ \| '_ \ / _` |/ _` |/ _ \ \ /\ / / |   | | '_ \| |/ /
 ___) | | | | (_| | (_| | (_) \ V  V /| |___| | | | |   <
|____/|_| |_|\__,_|\__,_|\___/ \_/\_/ |_____|_|_| |_|_|\_\
";

/// Mask shortened URLs behind a trusted-looking domain.
#[derive(Parser)]
#[command(name = "shadowlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL to cloak (interactive prompt when omitted)
    url: Option<String>,

    /// Domain to disguise as (e.g. facebook.com)
    #[arg(short, long)]
    domain: Option<String>,

    /// Keyword to embed in the masked URL (e.g. login, verify)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Output format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process target URLs from a file, one per line (requires --domain and --keyword)
    #[arg(long, conflicts_with = "url")]
    batch: Option<PathBuf>,

    /// Restrict and order the shortening services to use
    #[arg(long, num_args = 1..)]
    services: Option<Vec<String>>,

    /// Per-service request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Tracing filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable the banner
    #[arg(long)]
    no_banner: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = config::load_cascade()?;
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    init_tracing(cli.log_level.as_deref(), &config);
    config.print_summary();

    if !config.colored_output {
        colored::control::set_override(false);
    }

    if config.show_banner {
        println!("{}", BANNER.cyan());
        println!("{} {}\n", "Version:".green(), env!("CARGO_PKG_VERSION"));
    }

    let backends = shadowlink::infrastructure::shorteners::registry(&config)?;
    let service = CloakService::new(backends);

    let formatter = OutputFormatter::new(config.output_format);
    let output_file = config.output_file.clone();

    let reports = match cli.batch {
        Some(ref batch_file) => run_batch(&cli, &config, &service, batch_file).await?,
        None => vec![run_single(&cli, &config, &service).await?],
    };

    formatter.emit(&reports, output_file.as_deref())?;

    Ok(())
}

/// Command-line flags win over every configuration layer.
fn apply_cli_overrides(config: &mut ShadowlinkConfig, cli: &Cli) {
    if let Some(format) = cli.format {
        config.output_format = format;
    }
    if let Some(ref output) = cli.output {
        config.output_file = Some(output.clone());
    }
    if let Some(ref services) = cli.services {
        config.enabled_services = services.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if cli.no_banner {
        config.show_banner = false;
    }
    if cli.no_color {
        config.colored_output = false;
    }
}

/// Installs the tracing subscriber.
///
/// Filter priority: `RUST_LOG` > `--log-level` > config file.
fn init_tracing(cli_level: Option<&str>, config: &ShadowlinkConfig) {
    use tracing_subscriber::EnvFilter;

    let fallback = cli_level.unwrap_or(&config.log_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored_output)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves one field either from a CLI argument or interactively.
///
/// A value supplied on the command line is validated once and a failure is
/// fatal. Interactive input re-prompts with the specific validation message
/// up to `max_attempts` times.
fn resolve_input<T>(
    provided: Option<&str>,
    prompt: &str,
    max_attempts: usize,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<T> {
    if let Some(raw) = provided {
        return parse(raw).map_err(Into::into);
    }

    for remaining in (0..max_attempts).rev() {
        let raw: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(e) => {
                eprintln!("{} {}", "[x]".red(), e);
                if remaining > 0 {
                    eprintln!("{}", format!("Please try again ({remaining} attempts remaining)").yellow());
                }
            }
        }
    }

    bail!("Maximum input attempts ({max_attempts}) exceeded")
}

/// Gathers inputs for one request (from flags or prompts) and cloaks it.
async fn run_single(
    cli: &Cli,
    config: &ShadowlinkConfig,
    service: &CloakService,
) -> Result<CloakReport> {
    let attempts = config.max_input_attempts;

    let target = resolve_input(
        cli.url.as_deref(),
        "Paste the original link to cloak (e.g. https://example.com)",
        attempts,
        validate_url,
    )?;
    let domain = resolve_input(
        cli.domain.as_deref(),
        "Enter a domain to disguise as (e.g. x.com)",
        attempts,
        validate_domain,
    )?;
    let max_keyword_length = config.max_keyword_length;
    let keyword = resolve_input(
        cli.keyword.as_deref(),
        "Choose a keyword to add (e.g. login, signup, verify)",
        attempts,
        |raw| validate_keyword(raw, max_keyword_length),
    )?;

    let request = CloakRequest::new(target, domain, keyword);
    match service.cloak(&request).await {
        Ok(outcome) => Ok(CloakReport::from_outcome(&request, &outcome)),
        Err(e) => {
            for failure in e.failures() {
                eprintln!("{} {}", "[x]".red(), failure);
            }
            Err(anyhow::Error::new(e)
                .context("No shortening service produced a usable link, try again later"))
        }
    }
}

/// Cloaks every URL listed in `batch_file` against a fixed domain/keyword.
///
/// Blank lines and `#` comments are skipped. A line that fails validation
/// or loses every backend is reported and skipped; the run continues.
async fn run_batch(
    cli: &Cli,
    config: &ShadowlinkConfig,
    service: &CloakService,
    batch_file: &std::path::Path,
) -> Result<Vec<CloakReport>> {
    let domain_raw = cli
        .domain
        .as_deref()
        .context("--batch requires --domain")?;
    let keyword_raw = cli
        .keyword
        .as_deref()
        .context("--batch requires --keyword")?;

    let domain = validate_domain(domain_raw)?;
    let keyword = validate_keyword(keyword_raw, config.max_keyword_length)?;

    let content = std::fs::read_to_string(batch_file)
        .with_context(|| format!("Failed to read batch file {}", batch_file.display()))?;

    let mut reports = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let target = match validate_url(line) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(line = line_no + 1, error = %e, "skipping invalid batch line");
                eprintln!("{} line {}: {}", "[x]".red(), line_no + 1, e);
                continue;
            }
        };

        let request = CloakRequest::new(target, domain.clone(), keyword.clone());

        match service.cloak(&request).await {
            Ok(outcome) => reports.push(CloakReport::from_outcome(&request, &outcome)),
            Err(e) => {
                eprintln!("{} line {}: {}", "[x]".red(), line_no + 1, e);
                reports.push(CloakReport::from_failure(&request, &e));
            }
        }
    }

    if reports.is_empty() {
        bail!(
            "Batch file {} contained no processable URLs",
            batch_file.display()
        );
    }

    Ok(reports)
}
