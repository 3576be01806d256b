//! Background polling lifecycle.
//!
//! While enabled, a dedicated worker thread waits for the next tick of a
//! fixed-rate timer and runs a poll cycle on every tick.  Disabling sends a
//! cancellation message over an [`mpsc`] channel and joins the thread, so
//! once [`Scheduler::disable`] returns no cycle is running and none will
//! start.
//!
//! ## For contributors
//!
//! The worker only ever blocks in [`mpsc::Receiver::recv_timeout`], which is
//! where cancellation is observed.  A cycle that is already running finishes
//! before the worker exits.  The first cycle runs one full interval after
//! enabling, never immediately.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::error::{ConfigError, LifecycleError};
use crate::poll::Poller;

/// Owns the worker thread for one enabled period at a time.
#[derive(Default)]
pub struct Scheduler {
    worker: Mutex<Option<Worker>>,
}

struct Worker {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.state().is_some()
    }

    /// Start polling every `interval`.
    ///
    /// Fails with [`LifecycleError::AlreadyEnabled`] if a worker is running;
    /// the running worker is left untouched.
    pub fn enable(&self, interval: Duration, poller: Arc<Poller>) -> Result<(), LifecycleError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval.into());
        }

        let mut state = self.state();
        if state.is_some() {
            return Err(LifecycleError::AlreadyEnabled);
        }

        let ticker = Ticker::new(interval)
            .ok_or(ConfigError::IntervalTooLong(interval.as_secs()))?;

        let (stop, stopped) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("feed-poller".into())
            .spawn(move || run(ticker, poller, stopped))?;

        *state = Some(Worker { stop, handle });
        info!(interval_secs = interval.as_secs_f64(), "polling enabled");
        Ok(())
    }

    /// Stop polling and wait for the worker to exit.
    ///
    /// Blocks until any in-flight cycle has completed.  Fails with
    /// [`LifecycleError::AlreadyDisabled`] if nothing is running.
    pub fn disable(&self) -> Result<(), LifecycleError> {
        // The lock is held across the join so a concurrent `enable` cannot
        // start a second worker while this one is still winding down.
        let mut state = self.state();
        let worker = state.take().ok_or(LifecycleError::AlreadyDisabled)?;
        worker.shutdown();
        info!("polling disabled");
        Ok(())
    }

    /// Run `f` on the calling thread while no worker can be started.
    ///
    /// Fails with [`LifecycleError::AlreadyEnabled`] if a worker is running.
    /// A concurrent `enable` blocks until `f` returns.
    pub fn run_exclusive<T>(&self, f: impl FnOnce() -> T) -> Result<T, LifecycleError> {
        let state = self.state();
        if state.is_some() {
            return Err(LifecycleError::AlreadyEnabled);
        }
        Ok(f())
    }

    fn state(&self) -> MutexGuard<'_, Option<Worker>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(worker) = self.state().take() {
            worker.shutdown();
        }
    }
}

impl Worker {
    fn shutdown(self) {
        // A send error means the worker already exited; joining is still
        // correct.
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            error!("poller thread panicked");
        }
    }
}

/// Worker loop: wait for a tick or cancellation, whichever comes first.
fn run(mut ticker: Ticker, poller: Arc<Poller>, stopped: mpsc::Receiver<()>) {
    loop {
        match stopped.recv_timeout(ticker.until_next()) {
            Err(RecvTimeoutError::Timeout) => {
                poller.run_cycle();
                if !ticker.advance() {
                    error!("next poll time is out of range; poller thread stopping");
                    return;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("poller thread stopping");
                return;
            }
        }
    }
}

/// Fixed-rate tick schedule.  Ticks that fall inside a long cycle are
/// dropped rather than queued.
struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// `None` if the first tick is not representable as an [`Instant`].
    fn new(interval: Duration) -> Option<Self> {
        Some(Self {
            interval,
            next: Instant::now().checked_add(interval)?,
        })
    }

    fn until_next(&self) -> Duration {
        self.next.saturating_duration_since(Instant::now())
    }

    /// Move to the first tick after now.  Returns `false` if that tick is not
    /// representable.
    fn advance(&mut self) -> bool {
        let now = Instant::now();
        let mut dropped = 0u32;
        loop {
            match self.next.checked_add(self.interval) {
                Some(next) => self.next = next,
                None => return false,
            }
            if self.next > now {
                break;
            }
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "poll cycle overran; skipping missed ticks");
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
