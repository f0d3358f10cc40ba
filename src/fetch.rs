use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Retrieves the raw bytes behind a URL.
///
/// Implementations must return [`FetchError::Cancelled`] promptly once `cancel`
/// fires. Retry policy, if any, lives inside the implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_bytes(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed [`Fetcher`] with exponential-backoff retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build http client: {err}"))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_once(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let url_str = url.as_str();
        let request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send();

        let mut response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(url_str)),
            response = request => response.map_err(|err| request_error(url_str, err))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str.to_owned(),
                status: status.as_u16(),
            });
        }
        if let Some(length) = response.content_length()
            && length > self.config.max_body_bytes as u64
        {
            return Err(FetchError::TooLarge {
                url: url_str.to_owned(),
                limit: self.config.max_body_bytes,
            });
        }

        let mut body = Vec::new();
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(url_str)),
                chunk = response.chunk() => chunk.map_err(|err| request_error(url_str, err))?,
            };
            let Some(chunk) = chunk else {
                break;
            };
            if body.len() + chunk.len() > self.config.max_body_bytes {
                return Err(FetchError::TooLarge {
                    url: url_str.to_owned(),
                    limit: self.config.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let parsed = parse_http_url(url)?;
        let attempts = self.config.max_retries.saturating_add(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.fetch_once(&parsed, cancel).await {
                Ok(body) => {
                    tracing::debug!(url, attempt, bytes = body.len(), "fetched");
                    return Ok(body);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= attempts {
                return Err(err);
            }

            let delay = self.config.backoff(attempt - 1);
            tracing::warn!(
                url,
                attempt,
                attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient fetch failure; retrying"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(url)),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: err.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme: {}", parsed.scheme()),
        });
    }
    Ok(parsed)
}

fn request_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
        }
    } else {
        FetchError::Request {
            url: url.to_owned(),
            source: err,
        }
    }
}

fn cancelled(url: &str) -> FetchError {
    FetchError::Cancelled {
        url: url.to_owned(),
    }
}
