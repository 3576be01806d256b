//! Plugin configuration.
//!
//! Configuration is read once (from TOML, or built in code), validated at the
//! boundary, and then treated as immutable by a running scheduler:
//!
//! ```toml
//! refresh_interval = 3600
//! feed_urls = [
//!     "https://xkcd.com/rss.xml",
//!     "https://news.ycombinator.com/rss",
//! ]
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

/// One year.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 365 * 24 * 3600;

const DEFAULT_FEED_URLS: [&str; 3] = [
    "https://lorem-rss.herokuapp.com/feed",
    "https://xkcd.com/rss.xml",
    "https://news.ycombinator.com/rss",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between poll cycles.
    pub refresh_interval: u64,
    /// Feeds to poll, in order.
    pub feed_urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            feed_urls: DEFAULT_FEED_URLS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn new(refresh_interval: u64, feed_urls: Vec<String>) -> Self {
        Self {
            refresh_interval,
            feed_urls,
        }
    }

    /// Parse and validate a TOML document.  Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check the invariants a scheduler relies on.
    ///
    /// An empty feed list is valid; every cycle is then a no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.refresh_interval > MAX_REFRESH_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooLong(self.refresh_interval));
        }
        for raw in &self.feed_urls {
            let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl {
                    url: raw.clone(),
                    reason: format!("unsupported scheme {:?}", url.scheme()),
                });
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_polls_three_feeds_hourly() {
        let config = Config::default();
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert_eq!(config.feed_urls.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_document() {
        let config = Config::from_toml_str(
            r#"
            refresh_interval = 60
            feed_urls = ["https://example.com/a.xml", "http://example.org/b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.refresh_interval, 60);
        assert_eq!(config.feed_urls[1], "http://example.org/b");
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = Config::from_toml_str("refresh_interval = 10").unwrap();
        assert_eq!(config.feed_urls, Config::default().feed_urls);
    }

    #[test]
    fn empty_feed_list_is_valid() {
        let config = Config::from_toml_str("feed_urls = []").unwrap();
        assert!(config.feed_urls.is_empty());
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = Config::from_toml_str(r#"refresh_interval = "soon""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Config::from_toml_str("feeds = []").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "unknown keys are rejected");
    }

    #[test]
    fn rejects_zero_interval() {
        let err = Config::from_toml_str("refresh_interval = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval));
    }

    #[test]
    fn rejects_interval_beyond_a_year() {
        let err = Config::from_toml_str("refresh_interval = 9223372036854775807\nfeed_urls = []")
            .unwrap_err();
        assert!(matches!(err, ConfigError::IntervalTooLong(9223372036854775807)));

        let config = Config::new(MAX_REFRESH_INTERVAL_SECS, vec![]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_urls() {
        let config = Config::new(60, vec!["ftp://example.com/feed".into()]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        let config = Config::new(60, vec!["not a url".into()]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        std::fs::write(&path, "refresh_interval = 5\nfeed_urls = []\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::new(5, vec![]));
    }
}
