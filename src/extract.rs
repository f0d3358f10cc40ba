use std::sync::Arc;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::content::{self, ExtractOptions, Extraction};
use crate::error::ExtractError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::formats::ExtractRecord;

const SEPARATOR: &str = "==============================================";

/// Fetches a page through the injected [`Fetcher`] and extracts its content.
///
/// Holds no per-call state; one instance may serve any number of concurrent
/// extractions.
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Single attempt; any retry happens inside the fetcher.
    pub async fn fetch_and_extract(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Extraction, ExtractError> {
        let html = self.fetcher.fetch_bytes(url, cancel).await?;
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        let options = self.options;
        let extraction =
            tokio::task::spawn_blocking(move || content::extract_content_with(&html, &options))
                .await
                .map_err(join_failure)??;

        tracing::debug!(
            url,
            chars = extraction.text.chars().count(),
            body_found = extraction.body_found,
            "extracted"
        );
        Ok(extraction)
    }
}

fn join_failure(err: tokio::task::JoinError) -> ExtractError {
    if err.is_cancelled() {
        ExtractError::Cancelled
    } else {
        ExtractError::Task(err.to_string())
    }
}

pub async fn run(args: ExtractArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let raw_url = match args.url.or(args.target) {
        Some(url) => url,
        None => {
            tracing::info!("no url given; reading one from stdin");
            crate::input::read_stdin_url().await?
        }
    };
    let url = crate::input::ensure_scheme(&raw_url).context("check url")?;

    let fetch_config = global.fetch_config();
    let cancel = crate::deadline::command_token(fetch_config.overall_timeout());
    let fetcher = HttpFetcher::new(fetch_config).context("build fetcher")?;
    let extractor = Extractor::new(Arc::new(fetcher));

    tracing::info!(url = %url, "extracting");
    let extraction = extractor
        .fetch_and_extract(&url, &cancel)
        .await
        .with_context(|| format!("extract content from {url}"))?;
    cancel.cancel();

    if args.json {
        let record = ExtractRecord {
            url,
            body_found: extraction.body_found,
            text: extraction.text,
        };
        println!(
            "{}",
            serde_json::to_string(&record).context("serialize extract record")?
        );
        return Ok(());
    }

    println!("{SEPARATOR}");
    if extraction.body_found {
        println!("|| extracted content ||");
    } else {
        println!("|| title only (no body content recognized) ||");
    }
    println!("{SEPARATOR}");
    println!("{}", extraction.text);
    println!("{SEPARATOR}");

    Ok(())
}
