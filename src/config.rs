use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Settings for [`crate::fetch::HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Additional attempts after the first one for retryable failures.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl FetchConfig {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            timeout: if timeout.is_zero() {
                DEFAULT_TIMEOUT
            } else {
                timeout
            },
            max_retries,
            ..Self::default()
        }
    }

    /// Deadline for a whole command: twice the per-request timeout.
    pub fn overall_timeout(&self) -> Duration {
        self.timeout.saturating_mul(2)
    }

    /// Backoff before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            user_agent: USER_AGENT.to_owned(),
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Settings for [`crate::scrape::ParallelScraper`]; fixed for the scraper's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScraperConfig {
    pub max_concurrency: usize,
    pub min_request_interval: Duration,
}

impl ScraperConfig {
    pub fn new(max_concurrency: usize, min_request_interval: Duration) -> Self {
        Self {
            max_concurrency,
            min_request_interval,
        }
    }

    /// Replaces zero values with the defaults.
    pub fn normalized(self) -> Self {
        Self {
            max_concurrency: if self.max_concurrency == 0 {
                DEFAULT_MAX_CONCURRENCY
            } else {
                self.max_concurrency
            },
            min_request_interval: if self.min_request_interval.is_zero() {
                DEFAULT_MIN_REQUEST_INTERVAL
            } else {
                self.min_request_interval
            },
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_concurrency == 0 {
            anyhow::bail!("max_concurrency must be at least 1");
        }
        if self.min_request_interval.is_zero() {
            anyhow::bail!("min_request_interval must be greater than zero");
        }
        Ok(())
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
        }
    }
}
