//! Fakes for the plugin's collaborators, shared by the poll, scheduler and
//! plugin test modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};

use crate::notify::NotificationSink;
use crate::source::{DataSource, FeedEntry};
use crate::storage::BlobStore;

/// Noon UTC on the given day of June 2025.
pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
}

/// An entry titled `title`, linked to `https://example.com/<title>`.
pub fn entry(title: &str, published: Option<DateTime<Utc>>) -> FeedEntry {
    FeedEntry::new(title, format!("https://example.com/{title}"), published)
}

/// Spin until `counter` reaches `target`, giving up after five seconds.
pub fn wait_for(counter: &AtomicUsize, target: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if counter.load(Ordering::SeqCst) >= target {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

/// A source that returns a fixed set of entries, or always fails.
pub struct FakeSource {
    name: String,
    entries: Result<Vec<FeedEntry>, String>,
    starts: Arc<AtomicUsize>,
    fetches: Arc<AtomicUsize>,
    delay: Duration,
}

impl FakeSource {
    pub fn new(name: &str, entries: Vec<FeedEntry>) -> Self {
        Self {
            name: name.to_string(),
            entries: Ok(entries),
            starts: Arc::new(AtomicUsize::new(0)),
            fetches: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(name: &str) -> Self {
        let mut source = Self::new(name, vec![]);
        source.entries = Err(format!("{name} is down"));
        source
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Count into counters shared with other sources.
    pub fn with_counters(mut self, starts: Arc<AtomicUsize>, fetches: Arc<AtomicUsize>) -> Self {
        self.starts = starts;
        self.fetches = fetches;
        self
    }

    /// Counter of completed fetches, readable after the source is moved away.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        self.fetches.clone()
    }

    /// Counter of fetches that have begun.
    pub fn start_counter(&self) -> Arc<AtomicUsize> {
        self.starts.clone()
    }
}

impl DataSource for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<FeedEntry>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.entries.clone().map_err(|e| anyhow!(e))
    }
}

/// Records every notification; fails for titles listed in `reject`.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, String)>>,
    reject: Vec<String>,
}

impl RecordingSink {
    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            reject: titles.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Titles delivered so far, in order.
    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, title: &str, message: &str) -> Result<()> {
        if self.reject.iter().any(|t| t == title) {
            return Err(anyhow!("sink rejected {title}"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

/// A blob store whose loads always fail; counts attempted saves.
#[derive(Default)]
pub struct BrokenStore {
    pub saves: AtomicUsize,
}

impl BlobStore for BrokenStore {
    fn load(&self) -> Result<Vec<u8>> {
        Err(anyhow!("storage offline"))
    }

    fn save(&self, _blob: &[u8]) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("storage offline"))
    }
}
