use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_MAX_CONCURRENCY, FetchConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// HTTP request timeout in seconds (the whole command gets twice this).
    #[arg(
        long,
        short = 't',
        global = true,
        env = "WEBEXACT_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub timeout_secs: u64,

    /// Retries for transient HTTP failures (network errors, 5xx).
    #[arg(long, global = true, env = "WEBEXACT_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new(Duration::from_secs(self.timeout_secs), self.max_retries)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the main text of a single page.
    Extract(ExtractArgs),
    /// Fetch an RSS/Atom feed and list its articles.
    Feed(FeedArgs),
    /// Extract many pages in parallel.
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Page URL; read from stdin when omitted. `https://` is assumed without a scheme.
    #[arg(value_name = "URL")]
    pub target: Option<String>,

    /// Page URL (alternative to the positional argument).
    #[arg(long, short = 'u', conflicts_with = "target")]
    pub url: Option<String>,

    /// Print a JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Feed (RSS/Atom) URL.
    #[arg(long, short = 'u')]
    pub url: String,

    /// Print only the article URLs, one per line.
    #[arg(long, conflicts_with = "json")]
    pub links_only: bool,

    /// Print the parsed feed as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Comma-separated page URLs; read one per stdin line when omitted.
    #[arg(long, short = 'u', value_delimiter = ',')]
    pub urls: Vec<String>,

    /// Scrape the articles listed in this feed instead.
    #[arg(long, conflicts_with = "urls")]
    pub feed: Option<String>,

    /// Maximum concurrent extractions.
    #[arg(
        long,
        short = 'c',
        env = "WEBEXACT_CONCURRENCY",
        default_value_t = DEFAULT_MAX_CONCURRENCY
    )]
    pub concurrency: usize,

    /// Minimum interval between outgoing requests in milliseconds.
    #[arg(long, env = "WEBEXACT_RATE_INTERVAL_MS", default_value_t = 500)]
    pub rate_interval_ms: u64,

    /// Print JSON Lines records instead of the text report.
    #[arg(long)]
    pub json: bool,
}
