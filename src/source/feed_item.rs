//! The entry type shared across all feed sources.
//!
//! `FeedEntry` is the normalised form of a single item from any data source.
//! Every source converts its native format into `FeedEntry`s so the poll
//! cycle can stay source-agnostic.

use chrono::{DateTime, Utc};

/// A single feed entry, normalised from any data source.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedEntry {
    /// Human-readable headline, used as the notification title.
    pub title: String,

    /// URL to the full content, used as the notification body.
    pub link: String,

    /// Publication timestamp, compared against the watermark.
    ///
    /// `None` means the source did not provide a parseable date.  Such
    /// entries cannot be ordered against the watermark and are skipped by
    /// the poll cycle.
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published,
        }
    }

    /// Whether this entry was published strictly after `instant`.
    ///
    /// Undated entries are never newer than anything.  A `None` instant is the
    /// zero watermark, so every dated entry is newer than it.
    pub fn is_newer_than(&self, instant: Option<DateTime<Utc>>) -> bool {
        match (self.published, instant) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(published), Some(instant)) => published > instant,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
