//! The monitor handle and its probe scheduler.
//!
//! # Data Flow
//! ```text
//! Scheduler tick
//!     → resolve target, run probe (bounded by probe_timeout_ms)
//!     → apply result under the state lock, iff the generation still matches
//!     → on a status transition, notify subscribers in registration order
//!     → sleep poll_interval_ms, repeat
//! ```
//!
//! Fixed-delay rescheduling: the next probe starts `poll_interval_ms` after
//! the previous one *completes*, so at most one probe is ever in flight and
//! slow targets cannot pile up requests.
//!
//! The generation counter is bumped by every `start()` and `stop()`. A probe
//! result tagged with an older generation is discarded on arrival, which
//! makes completions from a previous activation provably inert.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::MonitorConfig;
use crate::error::{Error, ProbeFailure, Result};
use crate::probe::{Probe, ProbeResult, TargetResolver};
use crate::state::ConnectionStatus;
use crate::subscribers::{SubscriberRegistry, SubscriptionId};
use crate::tracker::FailureTracker;

/// The mutable fields updated together, atomically, per probe result.
struct MonitorState {
    status: ConnectionStatus,
    tracker: FailureTracker,
    generation: u64,
}

struct Inner {
    config: MonitorConfig,
    probe: Arc<dyn Probe>,
    resolver: Arc<dyn TargetResolver>,
    state: Mutex<MonitorState>,
    subscribers: Mutex<SubscriberRegistry>,
}

/// Health monitor for a single remote service.
///
/// Owns the probe schedule exclusively: one handle, at most one active
/// scheduling loop. Deliberately not `Clone`; share by reference. Dropping
/// the handle stops the loop and guarantees no further notifications.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use upwatch::{HttpProbe, Monitor, MonitorConfig};
/// use url::Url;
///
/// # async fn run() -> upwatch::Result<()> {
/// let config = MonitorConfig::default();
/// let probe = HttpProbe::new(config.probe_timeout())
///     .map_err(|e| upwatch::ProbeFailure::Network(e.to_string()))?;
/// let monitor = Monitor::new(
///     config,
///     Arc::new(probe),
///     Arc::new(|| Url::parse("http://127.0.0.1:8080/api/health").unwrap()),
/// )?;
/// monitor.start();
/// monitor.wait_for_connection(Duration::from_secs(30)).await?;
/// # Ok(())
/// # }
/// ```
pub struct Monitor {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    /// Build a monitor from a validated config, a probe, and the resolver
    /// that supplies the probe target on every tick.
    ///
    /// The monitor starts inactive with status `Disconnected`; call
    /// [`start`](Self::start) to begin probing.
    pub fn new(
        config: MonitorConfig,
        probe: Arc<dyn Probe>,
        resolver: Arc<dyn TargetResolver>,
    ) -> Result<Self> {
        config.validate()?;
        let state = MonitorState {
            status: ConnectionStatus::Disconnected,
            tracker: FailureTracker::new(config.max_retries),
            generation: 0,
        };
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                probe,
                resolver,
                state: Mutex::new(state),
                subscribers: Mutex::new(SubscriberRegistry::default()),
            }),
            task: Mutex::new(None),
        })
    }

    /// Activate the probe schedule. The first probe fires immediately.
    ///
    /// Idempotent: starting an active monitor behaves as an atomic
    /// stop-then-start, with no overlapping activation.
    pub fn start(&self) {
        let mut task = self.task.lock();
        let generation = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.generation
        };
        if let Some(previous) = task.take() {
            previous.abort();
            debug!("Restarting active monitor");
        }
        info!(
            poll_interval_ms = self.inner.config.poll_interval_ms,
            probe_timeout_ms = self.inner.config.probe_timeout_ms,
            "Monitor starting"
        );
        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(run_schedule(inner, generation)));
    }

    /// Deactivate the probe schedule.
    ///
    /// Cancels the pending tick and invalidates any in-flight probe, so its
    /// eventual result is ignored on arrival. Idempotent.
    pub fn stop(&self) {
        let mut task = self.task.lock();
        self.inner.state.lock().generation += 1;
        if let Some(handle) = task.take() {
            handle.abort();
            info!("Monitor stopped");
        }
    }

    /// Register a callback invoked with the new reachability on every
    /// status transition. Callbacks run on the scheduler task, in
    /// registration order; a panic inside one is logged and contained.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.inner.subscribers.lock().register(Arc::new(callback))
    }

    /// Remove a previously registered callback.
    ///
    /// Returns `false` when the id was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.lock().unsubscribe(id)
    }

    /// Snapshot of the current reachability belief.
    pub fn current_status(&self) -> ConnectionStatus {
        self.inner.state.lock().status
    }

    /// Consecutive probe failures since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.inner.state.lock().tracker.failures()
    }

    /// Wait until the service is reachable, or give up after `timeout`.
    ///
    /// Returns immediately when the status is already `Connected`, even
    /// with a zero timeout. Otherwise re-checks the status every
    /// `wait_poll_interval_ms` without ever sleeping past the deadline.
    /// Concurrent waiters only read shared state and need no coordination.
    pub async fn wait_for_connection(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.current_status().is_connected() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::WaitTimeout {
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            let nap = self
                .inner
                .config
                .wait_poll_interval()
                .min(deadline - now);
            time::sleep(nap).await;
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One activation of the scheduler loop.
///
/// Exits when the generation it was started with is superseded.
async fn run_schedule(inner: Arc<Inner>, generation: u64) {
    loop {
        let target = inner.resolver.resolve();
        let outcome = match time::timeout(
            inner.config.probe_timeout(),
            inner.probe.perform(&target),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProbeFailure::Timeout),
        };

        if !apply_probe_result(&inner, generation, &target, outcome) {
            return;
        }
        time::sleep(inner.config.poll_interval()).await;
    }
}

/// Fold one probe outcome into the shared state.
///
/// Returns `false` when the result is stale (a newer activation owns the
/// schedule) and the caller must exit. Status, failure count, and generation
/// are all read and written under one lock; subscriber callbacks run after
/// it is released.
fn apply_probe_result(
    inner: &Inner,
    generation: u64,
    target: &Url,
    outcome: ProbeResult,
) -> bool {
    let success = outcome.is_ok();
    let (connected, transitioned, failures, exhausted) = {
        let mut state = inner.state.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "Discarding stale probe result"
            );
            return false;
        }
        let exhausted = if success {
            state.tracker.record_success();
            false
        } else {
            state.tracker.record_failure()
        };
        let (next, transitioned) = state.status.apply(success);
        state.status = next;
        (
            next.is_connected(),
            transitioned,
            state.tracker.failures(),
            exhausted,
        )
    };

    match &outcome {
        Ok(ok) => debug!(
            target = %target,
            latency_ms = ok.latency.as_millis() as u64,
            "Probe succeeded"
        ),
        Err(failure) => warn!(
            target = %target,
            error = %failure,
            failures,
            "Probe failed"
        ),
    }
    if exhausted {
        // Informational escalation: the schedule keeps running.
        warn!(
            failures,
            max_retries = inner.config.max_retries,
            "Retry limit reached, continuing to probe"
        );
    }
    if transitioned {
        info!(connected, "Connection status changed");
        let entries = inner.subscribers.lock().snapshot();
        SubscriberRegistry::notify(&entries, connected);
    }
    true
}
