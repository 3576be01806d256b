//! feed-notify — poll RSS feeds on an interval and send a notification for
//! every entry published since the last poll.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ tick  ┌──────────┐ fetch  ┌────────────┐
//! │ scheduler.rs │ ────► │ poll.rs  │ ─────► │  source/   │
//! │   (thread)   │       │ (cycle)  │        │ (rss feed) │
//! └──────────────┘       └──────────┘        └────────────┘
//!                          │      │ send
//!                load/save │      └──────► notify.rs
//!                          ▼
//!                    watermark.rs ──► storage.rs (blob)
//!                          ▲
//!                          │ load
//!                      status.rs
//! ```
//!
//! * **`source/`** — the `DataSource` trait and the RSS implementation.
//! * **`poll`** — one fetch-compare-notify-persist cycle.
//! * **`scheduler`** — the enable/disable lifecycle and worker thread.
//! * **`watermark`** — the persisted "newest notified entry" timestamp.
//! * **`storage`** / **`notify`** — the blob store and notification sink
//!   collaborators.
//! * **`status`** — the human-readable status line.
//! * **`config`** — typed, validated configuration.
//! * **`plugin`** — wires everything together behind one host-facing type.

pub mod config;
pub mod error;
pub mod notify;
pub mod plugin;
pub mod poll;
pub mod scheduler;
pub mod source;
pub mod status;
pub mod storage;
pub mod watermark;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use error::{ConfigError, LifecycleError, WatermarkError};
pub use notify::{GotifySink, LogSink, NotificationSink};
pub use plugin::FeedPlugin;
pub use poll::{CycleReport, Poller};
pub use scheduler::Scheduler;
pub use source::{DataSource, FeedEntry, RssSource};
pub use storage::{BlobStore, FileStore, MemoryStore};
pub use watermark::{Watermark, WatermarkStore};
