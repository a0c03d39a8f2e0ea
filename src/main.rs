//! CLI entry point for the engagement rater.
//!
//! Provides subcommands for fetching a user's posts into a CSV file and for
//! analyzing such a file into histogram, hourly, length and word tables.

mod infra;

use crate::infra::keys::ApiCredentials;
use crate::infra::twitter::client::TwitterClient;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use engagement_rater::analyzers::analyzer::{AnalysisConfig, analyze_file};
use engagement_rater::analyzers::grade::Grade;
use engagement_rater::analyzers::lexical::PartOfSpeechFilter;
use engagement_rater::output::{print_pretty, save_posts, save_report, to_json};
use engagement_rater::services::timeline_api::fetch_timeline;
use engagement_rater::tokenizer::MecabTokenizer;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "engagement_rater")]
#[command(about = "Fetch a user's posts and analyze their engagement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a user's own posts (no reposts or replies) into a CSV file
    Fetch {
        /// Screen name to fetch posts for
        #[arg(short, long)]
        username: String,

        /// Number of posts to fetch (10-1000)
        #[arg(short = 'n', long, default_value_t = 100)]
        max_results: usize,

        /// JSON credentials file; falls back to TWITTER_BEARER_TOKEN
        #[arg(short, long)]
        credentials: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "twitter_data.csv")]
        output: String,
    },
    /// Analyze a posts CSV file
    Analyze {
        /// Posts CSV produced by `fetch`
        #[arg(value_name = "CSV")]
        input: String,

        /// Grades to rank frequent words for (repeatable; default all)
        #[arg(short, long = "grade")]
        grades: Vec<Grade>,

        /// Which tokens count as words
        #[arg(long, value_enum, default_value_t = PartOfSpeechFilter::CommonNounMinLength2)]
        noun_filter: PartOfSpeechFilter,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/engagement_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("engagement_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            username,
            max_results,
            credentials,
            output,
        } => {
            let bearer = ApiCredentials::resolve_bearer(credentials.as_deref())?;
            let client = TwitterClient::new(&bearer)?;

            let posts = match fetch_timeline(&client, &username, max_results).await {
                Ok(posts) => posts,
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "Fetch failed with a transient error; retry later");
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };

            save_posts(&output, &username, &posts)
                .with_context(|| format!("failed to write '{output}'"))?;
            info!(username = %username, rows = posts.len(), output = %output, "Fetch complete");
        }
        Commands::Analyze {
            input,
            grades,
            noun_filter,
            output,
        } => {
            let config = AnalysisConfig {
                grades: if grades.is_empty() {
                    Grade::ALL.to_vec()
                } else {
                    grades
                },
                filter: noun_filter,
            };

            let tokenizer = MecabTokenizer::from_env();
            if let Err(e) = tokenizer.probe() {
                warn!(error = %e, "Morphological analyzer not available");
            }

            let report = analyze_file(&input, &config, &tokenizer)
                .with_context(|| format!("failed to analyze '{input}'"))?;
            print_pretty(&report);

            match &output {
                Some(path) => save_report(path, &report)?,
                None => println!("{}", to_json(&report)?),
            }

            if let Some(reason) = &report.lexical_error {
                error!(reason = %reason, "Word rankings missing from report");
                bail!("word ranking failed: {reason}");
            }
        }
    }

    Ok(())
}
