//! WikiCheck command-line interface
//!
//! Checks claims against Wikipedia from the terminal, one at a time, from a
//! file, or interactively. Results can be exported and are kept in a local
//! history file.

mod render;

use anyhow::Context;
use backoff::{future::retry_notify, ExponentialBackoffBuilder};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use wikicheck_common::{
    config::{AnalyzerMode, AppConfig},
    errors::AppError,
    export::{export_report, ExportFormat},
    history::HistoryStore,
    models::{AnalysisResult, FactCheckReport},
    FactChecker,
};

#[derive(Parser)]
#[command(name = "wikicheck", version, about = "Check claims against Wikipedia evidence")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML or YAML); defaults to config/ layering
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Retries for rate-limited or timed-out searches
    #[arg(long, global = true, default_value_t = 2)]
    retries: u32,

    /// Log at the configured level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Check a single claim
    Check {
        claim: String,
        #[command(flatten)]
        options: CheckOptions,
    },
    /// Check every non-empty line of a file
    Batch {
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        options: CheckOptions,
    },
    /// Read claims from stdin until quit
    Interactive {
        #[command(flatten)]
        options: CheckOptions,
    },
    /// Show recent checks, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Clone)]
struct CheckOptions {
    /// Documents to fetch per claim
    #[arg(long)]
    max_articles: Option<usize>,

    /// Analyzer: keyword or llm
    #[arg(long)]
    mode: Option<AnalyzerMode>,

    /// Also write each report as json or csv (export.default_format when
    /// no value is given)
    #[arg(long)]
    export: Option<Option<ExportFormat>>,

    /// Do not record results in history
    #[arg(long)]
    no_history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    init_tracing(&config, cli.verbose);

    if let Command::History { limit } = cli.command {
        let history = HistoryStore::new(&config.history.path);
        let limit = limit.unwrap_or(config.history.display_limit);
        println!("{}", render::render_history(&history.recent(limit)));
        return Ok(ExitCode::SUCCESS);
    }

    let session = Session::new(Arc::new(config), cli.retries)?;

    let ok = match cli.command {
        Command::Check { claim, options } => session.check_one(&claim, &options).await,
        Command::Batch { file, options } => session.check_file(&file, &options).await?,
        Command::Interactive { options } => session.interactive(&options).await?,
        Command::History { .. } => true,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_tracing(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        config.observability.log_level.as_str()
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

struct Session {
    config: Arc<AppConfig>,
    checker: FactChecker,
    history: HistoryStore,
    retries: u32,
}

impl Session {
    fn new(config: Arc<AppConfig>, retries: u32) -> anyhow::Result<Self> {
        let checker = FactChecker::from_config(config.clone())?;
        Ok(Self {
            history: HistoryStore::new(&config.history.path),
            checker,
            config,
            retries,
        })
    }

    /// Run one claim, retrying rate-limit and timeout failures with
    /// exponential backoff up to `retries` times
    async fn run_with_retry(
        &self,
        claim: &str,
        options: &CheckOptions,
    ) -> Result<AnalysisResult, AppError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_secs(1))
            .with_max_interval(Duration::from_secs(16))
            .with_max_elapsed_time(None)
            .build();

        let checker = &self.checker;
        let retries = self.retries;
        let mut attempts = 0u32;

        retry_notify(
            policy,
            || {
                attempts += 1;
                let attempt = attempts;
                async move {
                    checker
                        .run_fact_check(claim, options.max_articles, options.mode)
                        .await
                        .map_err(|e| {
                            if e.is_retryable() && attempt <= retries {
                                backoff::Error::transient(e)
                            } else {
                                backoff::Error::permanent(e)
                            }
                        })
                }
            },
            |e: AppError, wait: Duration| {
                warn!(error = %e, wait_ms = wait.as_millis() as u64, "Retrying fact check");
            },
        )
        .await
    }

    /// Check, print, export and record one claim. Returns the report, or
    /// None after printing the error.
    async fn check(&self, claim: &str, options: &CheckOptions) -> Option<FactCheckReport> {
        println!("\nFact-checking: '{}'", claim);

        let result = match self.run_with_retry(claim, options).await {
            Ok(result) => result,
            Err(e) => {
                println!("API error: {}. Please try again in a moment.", e);
                return None;
            }
        };

        let report = FactCheckReport::new(claim, result);
        println!("{}", render::render_report(&report));

        if let Some(format) = options.export {
            let format = format.unwrap_or_else(|| {
                self.config
                    .export
                    .default_format
                    .parse()
                    .unwrap_or_default()
            });
            let directory = Path::new(&self.config.export.directory);
            match export_report(&report, format, directory, None) {
                Ok(path) => println!("Exported to {}", path.display()),
                Err(e) => eprintln!("{}", e),
            }
        }

        Some(report)
    }

    fn record(&self, reports: &[FactCheckReport], options: &CheckOptions) {
        if options.no_history {
            return;
        }
        if let Err(e) = self.history.append(reports) {
            warn!(error = %e, "Could not save history");
        }
    }

    async fn check_one(&self, claim: &str, options: &CheckOptions) -> bool {
        match self.check(claim.trim(), options).await {
            Some(report) => {
                self.record(std::slice::from_ref(&report), options);
                true
            }
            None => false,
        }
    }

    /// Every claim is attempted; returns false if any failed
    async fn check_file(&self, file: &Path, options: &CheckOptions) -> anyhow::Result<bool> {
        let contents = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let claims = claims_from_lines(&contents);

        let mut reports = Vec::with_capacity(claims.len());
        for claim in &claims {
            if let Some(report) = self.check(claim, options).await {
                reports.push(report);
            }
        }
        self.record(&reports, options);

        println!("\nChecked {} of {} claims", reports.len(), claims.len());
        Ok(reports.len() == claims.len())
    }

    async fn interactive(&self, options: &CheckOptions) -> anyhow::Result<bool> {
        println!("=== Wikipedia Fact-Checker ===");
        println!("Enter a claim to fact-check (or 'quit' to exit):");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("\nClaim: ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let claim = line.trim();
            if is_quit(claim) {
                break;
            }
            if claim.is_empty() {
                continue;
            }
            if let Some(report) = self.check(claim, options).await {
                self.record(std::slice::from_ref(&report), options);
            }
        }
        Ok(true)
    }
}

/// Trimmed non-empty lines
fn claims_from_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q")
}
