use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::cli::{GlobalArgs, ScrapeArgs};
use crate::config::ScraperConfig;
use crate::error::{CancelStage, ErrorKind, ScrapeError};
use crate::extract::Extractor;
use crate::feed::{FeedParser, LinkSource as _};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::formats::ScrapeRecord;

const PREVIEW_CHARS: usize = 100;
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(2);

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Outcome for one input URL; `content` is empty whenever `error` is set.
#[derive(Debug)]
pub struct UrlResult {
    pub url: String,
    pub content: String,
    pub error: Option<ScrapeError>,
}

impl UrlResult {
    fn failed(error: ScrapeError) -> Self {
        Self {
            url: error.url().to_owned(),
            content: String::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Extracts many pages with at most `max_concurrency` tasks in flight and at
/// least `min_request_interval` between two task starts.
///
/// The semaphore and the rate limiter belong to this instance alone.
pub struct ParallelScraper {
    extractor: Arc<Extractor>,
    semaphore: Arc<Semaphore>,
    limiter: Arc<DirectLimiter>,
    config: ScraperConfig,
}

impl ParallelScraper {
    pub fn new(extractor: Arc<Extractor>, config: ScraperConfig) -> Self {
        let config = config.normalized();
        let quota = Quota::with_period(config.min_request_interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN));
        Self {
            extractor,
            semaphore: Arc::new(Semaphore::new(config.max_concurrency)),
            limiter: Arc::new(RateLimiter::direct(quota)),
            config,
        }
    }

    pub fn config(&self) -> ScraperConfig {
        self.config
    }

    /// One result per input URL, in completion order.
    ///
    /// Returns only after every spawned task has finished. Once `cancel` fires,
    /// URLs not yet dispatched are recorded as cancelled without being fetched.
    pub async fn scrape_in_parallel(
        &self,
        cancel: &CancellationToken,
        urls: &[String],
    ) -> Vec<UrlResult> {
        let total = urls.len();
        let mut results = Vec::with_capacity(total);
        let mut reported = vec![false; total];
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, UrlResult)>();
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let acquired = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = Arc::clone(&self.semaphore).acquire_owned() => Some(permit),
            };
            let permit = match acquired {
                Some(Ok(permit)) => permit,
                Some(Err(_closed)) => {
                    reported[index] = true;
                    results.push(UrlResult::failed(ScrapeError::Aborted {
                        url: url.clone(),
                        reason: "semaphore closed".to_owned(),
                    }));
                    continue;
                }
                None => {
                    reported[index] = true;
                    results.push(UrlResult::failed(ScrapeError::Cancelled {
                        url: url.clone(),
                        stage: CancelStage::Dispatch,
                    }));
                    continue;
                }
            };

            let extractor = Arc::clone(&self.extractor);
            let limiter = Arc::clone(&self.limiter);
            let cancel = cancel.clone();
            let tx = tx.clone();
            let url = url.clone();
            tasks.spawn(async move {
                let result = scrape_one(&extractor, &limiter, &cancel, url).await;
                drop(permit);
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let started_at = Instant::now();
        let mut last_progress_log_at = started_at;
        let mut failed = results.len();
        while let Some((index, result)) = rx.recv().await {
            if std::mem::replace(&mut reported[index], true) {
                tracing::warn!(url = %result.url, "duplicate scrape result ignored");
                continue;
            }
            match &result.error {
                None => tracing::debug!(url = %result.url, chars = result.content.chars().count(), "scraped"),
                Some(err) => {
                    failed += 1;
                    tracing::debug!(url = %result.url, error = %err, "scrape failed");
                }
            }
            results.push(result);

            if results.len() == total || last_progress_log_at.elapsed() >= PROGRESS_LOG_INTERVAL {
                tracing::info!(
                    done = results.len(),
                    total,
                    failed,
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    "scrape: progress"
                );
                last_progress_log_at = Instant::now();
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "scrape task did not complete");
            }
        }

        for (index, url) in urls.iter().enumerate() {
            if !reported[index] {
                results.push(UrlResult::failed(ScrapeError::Aborted {
                    url: url.clone(),
                    reason: "task ended without a result".to_owned(),
                }));
            }
        }

        results
    }
}

async fn scrape_one(
    extractor: &Extractor,
    limiter: &DirectLimiter,
    cancel: &CancellationToken,
    url: String,
) -> UrlResult {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return UrlResult::failed(ScrapeError::Cancelled {
                url,
                stage: CancelStage::RateLimit,
            });
        }
        _ = limiter.until_ready() => {}
    }

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        outcome = extractor.fetch_and_extract(&url, cancel) => Some(outcome),
    };

    match outcome {
        None => UrlResult::failed(ScrapeError::Cancelled {
            url,
            stage: CancelStage::Fetch,
        }),
        Some(Err(err)) if err.kind() == ErrorKind::CancellationFailure => {
            UrlResult::failed(ScrapeError::Cancelled {
                url,
                stage: CancelStage::Fetch,
            })
        }
        Some(Err(source)) => UrlResult::failed(ScrapeError::Extract { url, source }),
        Some(Ok(extraction)) if !extraction.body_found => {
            UrlResult::failed(ScrapeError::NoBody { url })
        }
        Some(Ok(extraction)) => UrlResult {
            url,
            content: extraction.text,
            error: None,
        },
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

pub async fn run(args: ScrapeArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let scraper_config =
        ScraperConfig::new(args.concurrency, Duration::from_millis(args.rate_interval_ms));
    scraper_config
        .validate()
        .context("check scraper settings")?;

    let fetch_config = global.fetch_config();
    let cancel = crate::deadline::command_token(fetch_config.overall_timeout());
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(fetch_config).context("build fetcher")?);

    let raw_urls = if !args.urls.is_empty() {
        args.urls
    } else if let Some(feed_url) = &args.feed {
        let feed_url = crate::input::ensure_scheme(feed_url).context("check --feed")?;
        tracing::info!(url = %feed_url, "collecting urls from feed");
        FeedParser::new(Arc::clone(&fetcher))
            .fetch_and_parse(&feed_url, &cancel)
            .await?
            .links()
    } else {
        tracing::info!("no urls given; reading them from stdin");
        crate::input::read_stdin_lines().await?
    };
    let urls = crate::input::prepare_urls(raw_urls).context("check urls")?;
    if urls.is_empty() {
        anyhow::bail!("no urls to scrape");
    }

    let scraper = ParallelScraper::new(Arc::new(Extractor::new(fetcher)), scraper_config);
    tracing::info!(
        urls = urls.len(),
        concurrency = scraper.config().max_concurrency,
        interval_ms = scraper.config().min_request_interval.as_millis() as u64,
        "scraping"
    );
    let results = scraper.scrape_in_parallel(&cancel, &urls).await;
    cancel.cancel();

    let succeeded = results.iter().filter(|result| result.is_ok()).count();
    let failed = results.len() - succeeded;

    if args.json {
        for result in &results {
            let record = ScrapeRecord {
                url: result.url.clone(),
                ok: result.is_ok(),
                chars: result.content.chars().count(),
                content: result.is_ok().then(|| result.content.clone()),
                error: result.error.as_ref().map(ToString::to_string),
            };
            println!(
                "{}",
                serde_json::to_string(&record).context("serialize scrape record")?
            );
        }
        tracing::info!(succeeded, failed, "scrape finished");
        return Ok(());
    }

    for (index, result) in results.iter().enumerate() {
        match &result.error {
            None => {
                println!("✅ [{}] {}", index + 1, result.url);
                println!("    chars: {}", result.content.chars().count());
                println!("    preview: {}", preview(&result.content));
            }
            Some(err) => {
                println!("❌ [{}] {}", index + 1, result.url);
                println!("    error: {err}");
            }
        }
    }
    println!("done: {succeeded} succeeded, {failed} failed");

    Ok(())
}
