use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use wordtally::config::Config;
use wordtally::extract::{collect_sources, extractors_for};
use wordtally::output::{json, terminal, ListOptions};
use wordtally::pipeline::Aggregator;

/// wordtally: word frequencies across strings, web pages, and files.
///
/// Every source is extracted and counted concurrently; the per-source
/// counts are merged into one table. A source that cannot be read is
/// skipped and reported, the rest are still counted.
#[derive(Parser)]
#[command(name = "wordtally", version, about)]
struct Cli {
    /// Count the words of this string
    #[arg(short = 's', long = "string")]
    string: Option<String>,

    /// Count the words of these URLs (whitespace-separated, flag may repeat)
    #[arg(short = 'u', long = "urls")]
    urls: Vec<String>,

    /// Count the words of these files (whitespace-separated, flag may repeat)
    #[arg(short = 'f', long = "files")]
    files: Vec<String>,

    /// Number of sources processed in parallel (default: 8)
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Per-source timeout in seconds (default: 30)
    #[arg(long)]
    timeout: Option<u64>,

    /// Give up on outstanding sources after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// List words by descending count
    #[arg(long)]
    sort: bool,

    /// Only list the N most frequent words (implies --sort)
    #[arg(long)]
    top: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging (stderr, so stdout stays pipeable)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wordtally=info")),
        )
        .init();

    let cli = Cli::parse();

    let sources = collect_sources(cli.string.as_deref(), &cli.urls, &cli.files);
    if sources.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "specify at least one source with -s, -u, or -f",
            )
            .exit();
    }

    let mut config = Config::load()?;
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = cli.timeout {
        config.source_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.deadline {
        config.deadline = Some(Duration::from_secs(secs));
    }
    config.validate()?;

    info!(sources = sources.len(), "Collected sources");

    let progress = if !cli.json && std::io::stderr().is_terminal() {
        let pb = ProgressBar::new(sources.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Sources [{bar:30}] {pos}/{len} ({eta})")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let extractors = extractors_for(&sources, &config)?;
    let report = Aggregator::from_config(&config)
        .with_progress(progress)
        .run(extractors)
        .await?;

    let options = ListOptions {
        sorted: cli.sort || cli.top.is_some(),
        top: cli.top,
    };

    if cli.json {
        println!("{}", json::to_json(&report, options)?);
    } else {
        terminal::display_counts(&report, options);
        terminal::display_summary(&report);
    }

    Ok(())
}
