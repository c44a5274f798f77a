use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod fields;
mod filter;
mod kpi;
mod models;
mod report;
mod source;
mod stats;
mod transform;

use config::Config;
use error::FetchError;
use filter::FilterSpec;
use models::KpiResult;
use source::{FileSource, HttpSource, SubmissionSource};

#[derive(Parser)]
#[command(name = "session-feedback-kpi")]
#[command(about = "Quality indicators from session feedback surveys", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Submission API endpoint (defaults to SUBMISSIONS_URL)
    #[arg(long)]
    url: Option<String>,
    /// Request timeout in seconds (defaults to SUBMISSIONS_TIMEOUT_SECS or 30)
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Read a JSON or CSV export instead of calling the API
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// Comma-separated session numbers
    #[arg(long)]
    sessions: Option<String>,
    /// First day included, YYYY-MM-DD
    #[arg(long)]
    start_date: Option<String>,
    /// Last day included, YYYY-MM-DD
    #[arg(long)]
    end_date: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec::from_params(
            self.sessions.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the indicator snapshot as JSON
    Kpi {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Write the JSON to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "kpi-report.md")]
        out: PathBuf,
    },
    /// List numbered sessions with their response counts and composite scores
    Sessions {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn build_source(args: &SourceArgs) -> anyhow::Result<SubmissionSource> {
    if let Some(path) = &args.input {
        return Ok(SubmissionSource::File(FileSource::new(path)));
    }
    let config = Config::resolve(args.url.clone(), args.timeout_secs)?;
    let source = HttpSource::new(&config).context("failed to build HTTP client")?;
    Ok(SubmissionSource::Http(source))
}

async fn compute(source: &SubmissionSource, filter: &FilterSpec) -> error::Result<KpiResult> {
    let raws = source.fetch().await?;
    let records = transform::transform_all(&raws);
    Ok(kpi::compute(&records, filter))
}

/// JSON error object printed in place of a result.
fn failure_body(err: &FetchError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&err.to_error_object())
}

/// A failed fetch ends the process with the error object on stdout.
async fn compute_or_exit(
    source: &SubmissionSource,
    filter: &FilterSpec,
) -> anyhow::Result<KpiResult> {
    match compute(source, filter).await {
        Ok(kpi) => Ok(kpi),
        Err(err) => {
            tracing::error!(error = %err, "submission fetch failed");
            println!("{}", failure_body(&err)?);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Kpi {
            source,
            filter,
            out,
        } => {
            let source = build_source(&source)?;
            let kpi = compute_or_exit(&source, &filter.to_spec()).await?;

            let json = serde_json::to_string_pretty(&kpi)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Indicators written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Report {
            source,
            filter,
            out,
        } => {
            let source = build_source(&source)?;
            let kpi = compute_or_exit(&source, &filter.to_spec()).await?;
            std::fs::write(&out, report::build_report(&kpi))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Sessions { source } => {
            let source = build_source(&source)?;
            let kpi = compute_or_exit(&source, &FilterSpec::default()).await?;

            if kpi.session_counts.is_empty() {
                println!("No numbered session in the submissions.");
                return Ok(());
            }

            println!("Sessions by response count:");
            for count in kpi.session_counts.iter() {
                let score = kpi
                    .session_scores
                    .iter()
                    .find(|s| s.session == count.session)
                    .map_or(0.0, |s| s.score);
                println!(
                    "- session {}: {} responses, composite {:.2} ({})",
                    count.session,
                    count.count,
                    score,
                    report::rating_band(score)
                );
            }
        }
    }

    Ok(())
}
