//! RSS feed source implementation.
//!
//! Fetches a feed over HTTP with blocking [`reqwest`] and parses it with the
//! [`rss`] crate.  Use it as a template when adding support for Atom, JSON
//! Feed, or any other format.

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{DataSource, FeedEntry};

/// An RSS feed data source.
pub struct RssSource {
    /// The feed URL to poll.
    pub url: String,
    /// A human-readable label used in log output.
    pub label: String,
}

impl RssSource {
    /// Create a new RSS source.
    ///
    /// # Arguments
    ///
    /// * `url` — full URL of the RSS feed (e.g. `https://xkcd.com/rss.xml`).
    /// * `label` — short name used when logging about this feed.
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Create a source labelled with its own URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            label: url.clone(),
            url,
        }
    }

    /// Parse an already-fetched [`rss::Channel`] into [`FeedEntry`]s.
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// parsing logic without hitting the network.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<FeedEntry> {
        channel
            .items()
            .iter()
            .map(|item| FeedEntry {
                title: item.title().unwrap_or("(untitled)").to_string(),
                link: item.link().unwrap_or_default().to_string(),
                published: published_at(item),
            })
            .collect()
    }
}

/// Publication time of an item.
///
/// `<pubDate>` is specified as RFC 2822 but RFC 3339 shows up in the wild, and
/// some feeds only carry a Dublin Core `<dc:date>`.
fn published_at(item: &rss::Item) -> Option<DateTime<Utc>> {
    item.pub_date()
        .and_then(parse_timestamp)
        .or_else(|| {
            item.dublin_core_ext()
                .and_then(|dc| dc.dates().iter().find_map(|d| parse_timestamp(d)))
        })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl DataSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Vec<FeedEntry>> {
        let body = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
