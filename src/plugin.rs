//! Host-facing plugin surface.
//!
//! [`FeedPlugin`] bundles the configuration, the injected collaborators and
//! the [`Scheduler`].  Collaborators are constructor arguments, so a plugin
//! always has somewhere to send notifications and keep its watermark.
//!
//! Configuration can be replaced at any time with [`FeedPlugin::set_config`],
//! but a running scheduler keeps the configuration it was enabled with; the
//! new one takes effect at the next [`FeedPlugin::enable`].

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::config::Config;
use crate::error::{ConfigError, LifecycleError};
use crate::notify::NotificationSink;
use crate::poll::{CycleReport, Poller};
use crate::scheduler::Scheduler;
use crate::source::{DataSource, RssSource};
use crate::status;
use crate::storage::BlobStore;
use crate::watermark::WatermarkStore;

/// Builds the source for one configured feed URL.
pub type SourceFactory = Box<dyn Fn(&str) -> Box<dyn DataSource> + Send + Sync>;

pub struct FeedPlugin {
    config: Mutex<Config>,
    sink: Arc<dyn NotificationSink>,
    store: WatermarkStore,
    make_source: SourceFactory,
    scheduler: Scheduler,
}

impl FeedPlugin {
    /// Create a disabled plugin.  Fails if `config` does not validate.
    pub fn new(
        config: Config,
        sink: Arc<dyn NotificationSink>,
        store: Arc<dyn BlobStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Mutex::new(config),
            sink,
            store: WatermarkStore::new(store),
            make_source: Box::new(|url: &str| -> Box<dyn DataSource> {
                Box::new(RssSource::from_url(url))
            }),
            scheduler: Scheduler::new(),
        })
    }

    /// Replace the RSS source with something else, e.g. another feed format.
    pub fn with_source_factory(
        mut self,
        factory: impl Fn(&str) -> Box<dyn DataSource> + Send + Sync + 'static,
    ) -> Self {
        self.make_source = Box::new(factory);
        self
    }

    pub fn config(&self) -> Config {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and store a new configuration.
    ///
    /// On error the previous configuration is kept.
    pub fn set_config(&self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    /// Start polling with the current configuration.  The first cycle runs
    /// after one refresh interval.
    pub fn enable(&self) -> Result<(), LifecycleError> {
        let config = self.config();
        let poller = Arc::new(self.poller_for(&config));
        let feeds = poller.source_count();
        self.scheduler.enable(config.interval(), poller)?;
        info!(feeds, "watching feeds");
        Ok(())
    }

    /// Stop polling.  Returns once the background cycle, if any, has
    /// finished.
    pub fn disable(&self) -> Result<(), LifecycleError> {
        self.scheduler.disable()
    }

    pub fn is_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    /// Run a single cycle on the calling thread.
    ///
    /// Refused while the scheduler is enabled, and a concurrent `enable`
    /// waits for the cycle to finish, so only one cycle at a time writes the
    /// watermark.
    pub fn run_once(&self) -> Result<CycleReport, LifecycleError> {
        let poller = self.poller_for(&self.config());
        self.scheduler.run_exclusive(|| poller.run_cycle())
    }

    /// Status line describing the last notified entry.
    pub fn display(&self) -> String {
        status::describe(&self.store)
    }

    fn poller_for(&self, config: &Config) -> Poller {
        let sources = config
            .feed_urls
            .iter()
            .map(|url| (self.make_source)(url.as_str()))
            .collect();
        Poller::new(sources, self.sink.clone(), self.store.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
