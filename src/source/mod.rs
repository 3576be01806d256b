//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the common [`FeedEntry`]
//! type.  Concrete source implementations live in sub-modules (currently only
//! [`rss`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomSource`) and implement [`DataSource`] for it.
//! 3. Add `mod atom;` below and re-export your struct in the `pub use` block.
//! 4. Teach [`crate::plugin::FeedPlugin`] to build it, or hand it to a
//!    [`crate::poll::Poller`] directly.
//!
//! The poll cycle and the watermark logic are source-agnostic.

mod feed_item;
mod rss;

pub use feed_item::FeedEntry;
pub use rss::RssSource;

use anyhow::Result;

/// Trait that every data source must implement.
///
/// The scheduler calls [`fetch()`](DataSource::fetch) on its worker thread
/// and keeps the sources alive across enable/disable periods, so
/// implementations must be [`Send`] and [`Sync`].
pub trait DataSource: Send + Sync {
    /// Human-readable label used in log output.
    fn name(&self) -> &str;

    /// Fetch every entry the source currently publishes.
    ///
    /// Implementations perform their own HTTP/IO work.  An error is logged by
    /// the poll cycle and the next source is tried; there is no retry until
    /// the next scheduled cycle.
    fn fetch(&self) -> Result<Vec<FeedEntry>>;
}
