//! One poll cycle: fetch every source, notify about new entries, advance the
//! watermark.
//!
//! ## How an entry qualifies
//!
//! The watermark loaded at the start of the cycle is the *baseline*.  Every
//! entry from every source is compared against that same baseline, with a
//! strict "published after" test, so:
//!
//! * an entry exactly at the watermark is never sent twice;
//! * a feed scanned later in the cycle is not shadowed by a newer entry from
//!   a feed scanned earlier.
//!
//! The newest qualifying timestamp is tracked separately and persisted once
//! all sources have been scanned.  The persisted value is never lower than
//! the baseline.
//!
//! ## Failures
//!
//! Nothing inside a cycle is fatal.  A source that fails to fetch is logged
//! and skipped, a notification that fails to send is logged and the next
//! entry is tried, and a failed save means the next cycle sends the same
//! entries again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::WatermarkError;
use crate::notify::NotificationSink;
use crate::source::DataSource;
use crate::watermark::{Watermark, WatermarkStore};

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Entries returned by all sources that could be fetched.
    pub entries_seen: usize,
    /// Notifications delivered.
    pub notified: usize,
    /// Entries skipped because they carry no usable timestamp.
    pub undated: usize,
    /// Sources whose fetch failed.
    pub failed_sources: usize,
    /// Qualifying entries whose notification could not be delivered.
    pub failed_sends: usize,
    /// Watermark at the end of the cycle.
    pub watermark: Watermark,
    /// Whether `watermark` reached the store.
    pub persisted: bool,
}

/// Runs poll cycles over a fixed set of sources.
pub struct Poller {
    sources: Vec<Box<dyn DataSource>>,
    sink: Arc<dyn NotificationSink>,
    store: WatermarkStore,
}

impl Poller {
    pub fn new(
        sources: Vec<Box<dyn DataSource>>,
        sink: Arc<dyn NotificationSink>,
        store: WatermarkStore,
    ) -> Self {
        Self {
            sources,
            sink,
            store,
        }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run one complete fetch-compare-notify-persist pass.
    pub fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        // When the store itself cannot be read the real watermark is unknown,
        // so the cycle must not overwrite it.  A malformed blob is replaced.
        let (baseline, may_save) = match self.store.load() {
            Ok(watermark) => (watermark, true),
            Err(e @ WatermarkError::Parse(_)) => {
                warn!(error = %e, "stored watermark is malformed; starting from zero");
                (Watermark::ZERO, true)
            }
            Err(e) => {
                warn!(error = %e, "stored watermark unavailable; starting from zero");
                (Watermark::ZERO, false)
            }
        };

        let mut newest = baseline;

        for source in &self.sources {
            let entries = match source.fetch() {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(source = source.name(), error = %e, "error while fetching feed");
                    report.failed_sources += 1;
                    continue;
                }
            };

            for entry in entries {
                report.entries_seen += 1;

                let Some(published) = entry.published else {
                    debug!(source = source.name(), title = %entry.title, "skipping undated entry");
                    report.undated += 1;
                    continue;
                };

                if !entry.is_newer_than(baseline.instant()) {
                    continue;
                }

                debug!(source = source.name(), title = %entry.title, %published, "new entry");
                match self.sink.send(&entry.title, &entry.link) {
                    Ok(()) => report.notified += 1,
                    Err(e) => {
                        warn!(title = %entry.title, error = %e, "could not send notification");
                        report.failed_sends += 1;
                    }
                }

                newest = newest.max(Watermark::at(published));
            }
        }

        report.watermark = newest;

        if may_save {
            match self.store.save(newest) {
                Ok(()) => report.persisted = true,
                Err(e) => warn!(error = %e, "could not persist watermark"),
            }
        } else {
            warn!(%newest, "not persisting watermark because the stored value could not be read");
        }

        info!(
            sources = self.sources.len(),
            entries = report.entries_seen,
            notified = report.notified,
            failed_sources = report.failed_sources,
            watermark = %report.watermark,
            "poll cycle finished"
        );

        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
