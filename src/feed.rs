//! RSS/Atom feeds as a source of article URLs.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::cli::{FeedArgs, GlobalArgs};
use crate::error::FeedError;
use crate::fetch::{Fetcher, HttpFetcher};

/// Anything that can list article URLs.
pub trait LinkSource {
    fn links(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub items: Vec<FeedItem>,
}

impl ParsedFeed {
    /// Link → title for items carrying both.
    pub fn titles_by_link(&self) -> HashMap<String, String> {
        self.items
            .iter()
            .filter_map(|item| Some((item.link.clone()?, item.title.clone()?)))
            .collect()
    }
}

impl LinkSource for ParsedFeed {
    /// Item links in feed order; items without a link are skipped.
    fn links(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.link.clone())
            .collect()
    }
}

impl From<feed_rs::model::Feed> for ParsedFeed {
    fn from(feed: feed_rs::model::Feed) -> Self {
        Self {
            title: feed.title.map(|text| text.content.trim().to_owned()),
            link: preferred_link(&feed.links),
            items: feed
                .entries
                .into_iter()
                .map(|entry| FeedItem {
                    title: entry
                        .title
                        .map(|text| text.content.trim().to_owned())
                        .filter(|title| !title.is_empty()),
                    link: preferred_link(&entry.links),
                    published: entry.published.or(entry.updated),
                })
                .collect(),
        }
    }
}

/// The `alternate` (or rel-less) link, else the first one.
fn preferred_link(links: &[feed_rs::model::Link]) -> Option<String> {
    links
        .iter()
        .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|link| link.href.trim().to_owned())
        .filter(|href| !href.is_empty())
}

pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, feed_rs::parser::ParseFeedError> {
    feed_rs::parser::parse(bytes).map(ParsedFeed::from)
}

pub struct FeedParser {
    fetcher: Arc<dyn Fetcher>,
}

impl FeedParser {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_and_parse(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ParsedFeed, FeedError> {
        let body = self
            .fetcher
            .fetch_bytes(url, cancel)
            .await
            .map_err(|source| FeedError::Fetch {
                url: url.to_owned(),
                source,
            })?;
        let feed = parse_feed(&body).map_err(|source| FeedError::Parse {
            url: url.to_owned(),
            source,
        })?;
        tracing::debug!(url, items = feed.items.len(), "parsed feed");
        Ok(feed)
    }
}

pub async fn run(args: FeedArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let url = crate::input::ensure_scheme(&args.url).context("check --url")?;

    let fetch_config = global.fetch_config();
    let cancel = crate::deadline::command_token(fetch_config.overall_timeout());
    let fetcher = HttpFetcher::new(fetch_config).context("build fetcher")?;
    let parser = FeedParser::new(Arc::new(fetcher));

    tracing::info!(url = %url, "fetching feed");
    let feed = parser.fetch_and_parse(&url, &cancel).await?;
    cancel.cancel();

    if args.links_only {
        for link in feed.links() {
            println!("{link}");
        }
        return Ok(());
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&feed).context("serialize feed")?
        );
        return Ok(());
    }

    println!("--- feed ---");
    println!("title: {}", feed.title.as_deref().unwrap_or(""));
    if let Some(link) = &feed.link {
        println!("link: {link}");
    }
    println!("items: {}", feed.items.len());
    println!("------------");
    for (index, item) in feed.items.iter().enumerate() {
        println!("[{}] {}", index + 1, item.title.as_deref().unwrap_or("(untitled)"));
        println!("    url: {}", item.link.as_deref().unwrap_or("(none)"));
        if let Some(published) = item.published {
            println!(
                "    published: {}",
                published
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    Ok(())
}
