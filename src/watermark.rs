//! The persisted watermark.
//!
//! A [`Watermark`] is the publication time of the newest entry that has
//! already been notified.  [`WatermarkStore`] encodes it as a small JSON
//! record inside the host's opaque blob:
//!
//! ```json
//! {"last_published":"2024-01-02T12:00:00Z"}
//! ```
//!
//! An empty blob, a record without `last_published`, and the sentinel
//! `0001-01-01T00:00:00Z` all decode to the zero watermark.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WatermarkError;
use crate::storage::BlobStore;

/// Unix time of `0001-01-01T00:00:00Z`.
const UNSET_SENTINEL_SECS: i64 = -62_135_596_800;

/// Publication time of the newest notified entry.
///
/// Ordered so that the zero watermark sorts before every real instant, which
/// lets callers advance it with [`Ord::max`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark(Option<DateTime<Utc>>);

impl Watermark {
    /// Nothing has ever been notified.
    pub const ZERO: Watermark = Watermark(None);

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(instant) => f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => f.write_str("never"),
        }
    }
}

/// On-disk shape of the watermark blob.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredWatermark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_published: Option<DateTime<Utc>>,
}

impl From<StoredWatermark> for Watermark {
    fn from(stored: StoredWatermark) -> Self {
        match stored.last_published {
            Some(ts) if ts.timestamp() == UNSET_SENTINEL_SECS && ts.timestamp_subsec_nanos() == 0 => {
                Watermark::ZERO
            }
            other => Watermark(other),
        }
    }
}

/// Reads and writes the [`Watermark`] through a [`BlobStore`].
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct WatermarkStore {
    blob: Arc<dyn BlobStore>,
}

impl WatermarkStore {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self { blob }
    }

    /// Load the persisted watermark.
    ///
    /// Callers decide how tolerant to be: the poll cycle carries on from the
    /// zero watermark, the status line reports the error text.
    pub fn load(&self) -> Result<Watermark, WatermarkError> {
        let bytes = self.blob.load().map_err(WatermarkError::Load)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Watermark::ZERO);
        }
        let stored: StoredWatermark =
            serde_json::from_slice(&bytes).map_err(WatermarkError::Parse)?;
        Ok(stored.into())
    }

    pub fn save(&self, watermark: Watermark) -> Result<(), WatermarkError> {
        let stored = StoredWatermark {
            last_published: watermark.instant(),
        };
        let bytes = serde_json::to_vec(&stored).map_err(WatermarkError::Encode)?;
        self.blob.save(&bytes).map_err(WatermarkError::Save)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
