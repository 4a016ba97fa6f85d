//! Mock [`Probe`] implementations for testing.
//!
//! - [`ScriptedProbe`] — Pre-loaded outcome queue with a shared call
//!   counter. Best for: transition sequences, retry accounting.
//! - [`PendingProbe`] — Never resolves. Best for: stop-before-completion
//!   and stale-generation behavior.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::probe::{Probe, ProbeResult, ProbeSuccess};

/// Fixed target for tests; nothing is ever contacted by the mock probes.
pub fn test_target() -> Url {
    Url::parse("http://127.0.0.1:8080/api/health").expect("static test URL")
}

/// A mock probe with a scripted outcome queue.
///
/// Each `perform` call pops the next outcome, defaulting to a success with
/// a small synthetic latency once the queue is exhausted.
pub struct ScriptedProbe {
    outcomes: Mutex<VecDeque<ProbeResult>>,
    calls: Arc<AtomicU32>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_outcomes(self, outcomes: Vec<ProbeResult>) -> Self {
        *self.outcomes.lock() = outcomes.into();
        self
    }

    /// Shared counter for asserting how many probes were issued.
    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn perform(&self, _target: &Url) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.lock().pop_front().unwrap_or(Ok(ProbeSuccess {
            latency: Duration::from_millis(5),
        }))
    }
}

/// A probe whose future never resolves.
pub struct PendingProbe;

#[async_trait]
impl Probe for PendingProbe {
    async fn perform(&self, _target: &Url) -> ProbeResult {
        std::future::pending().await
    }
}
