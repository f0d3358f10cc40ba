use std::fmt;

use thiserror::Error;

/// Coarse failure taxonomy shared by every stage of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseFailure,
    NothingExtracted,
    FetchFailure,
    CancellationFailure,
    /// A worker task panicked or ended without producing a result.
    TaskFailure,
}

/// Failures surfaced by a [`crate::fetch::Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("response body from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("fetch of {url} cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// Whether the failure may succeed on another attempt.
    ///
    /// Network errors, timeouts, 5xx and 429 are transient; every other status,
    /// a bad URL, an oversized body and cancellation are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidUrl { .. } | Self::TooLarge { .. } | Self::Cancelled { .. } => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled { .. } => ErrorKind::CancellationFailure,
            _ => ErrorKind::FetchFailure,
        }
    }
}

/// Failures of a single-page extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("parse html: {0}")]
    Parse(String),

    #[error("nothing could be extracted from the page")]
    NothingExtracted,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("extraction cancelled")]
    Cancelled,

    #[error("extraction task failed: {0}")]
    Task(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::ParseFailure,
            Self::NothingExtracted => ErrorKind::NothingExtracted,
            Self::Fetch(err) => err.kind(),
            Self::Cancelled => ErrorKind::CancellationFailure,
            Self::Task(_) => ErrorKind::TaskFailure,
        }
    }
}

/// Failures of [`crate::feed::FeedParser`].
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("parse feed {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },
}

/// Where a scrape task was when it observed cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelStage {
    /// The task was never started.
    Dispatch,
    /// Interrupted while waiting for the rate limiter.
    RateLimit,
    /// Interrupted during fetch or extraction.
    Fetch,
}

impl fmt::Display for CancelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Dispatch => "before dispatch",
            Self::RateLimit => "while waiting for rate limiter",
            Self::Fetch => "during fetch",
        };
        f.write_str(stage)
    }
}

/// Per-URL failure recorded by [`crate::scrape::ParallelScraper`].
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("extract content from {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("no usable body extracted from {url}")]
    NoBody { url: String },

    #[error("cancelled {stage}: {url}")]
    Cancelled { url: String, stage: CancelStage },

    #[error("scrape task for {url} aborted: {reason}")]
    Aborted { url: String, reason: String },
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extract { source, .. } => source.kind(),
            Self::NoBody { .. } => ErrorKind::NothingExtracted,
            Self::Cancelled { .. } => ErrorKind::CancellationFailure,
            Self::Aborted { .. } => ErrorKind::TaskFailure,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Extract { url, .. }
            | Self::NoBody { url }
            | Self::Cancelled { url, .. }
            | Self::Aborted { url, .. } => url,
        }
    }
}
