//! Reachability probes and target resolution.
//!
//! A [`Probe`] performs exactly one outbound check against a resolved target
//! and reports success (with latency) or a classified [`ProbeFailure`]. It
//! keeps no state between calls; streak accounting lives in the monitor.
//!
//! The target is resolved fresh for every probe through a
//! [`TargetResolver`], so deployments where the service address changes at
//! runtime (port remaps, DNS failover) are picked up on the next tick.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use url::Url;

use crate::error::ProbeFailure;

/// A successful probe, carrying the observed round-trip latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSuccess {
    pub latency: Duration,
}

pub type ProbeResult = std::result::Result<ProbeSuccess, ProbeFailure>;

/// One reachability check against an external target.
///
/// Implementations must resolve within the deadline they are constructed
/// with; the monitor additionally bounds every call with the configured
/// probe timeout, so a hanging implementation cannot stall the schedule.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn perform(&self, target: &Url) -> ProbeResult;
}

/// Supplies the address a probe should check.
///
/// Resolution may change between calls; the monitor never caches the result.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self) -> Url;
}

impl<F> TargetResolver for F
where
    F: Fn() -> Url + Send + Sync,
{
    fn resolve(&self) -> Url {
        self()
    }
}

/// HTTP GET probe: any 2xx response counts as reachable.
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Build a probe with its per-request deadline.
    ///
    /// Returns the underlying client builder error only if TLS backend
    /// initialization fails.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn perform(&self, target: &Url) -> ProbeResult {
        let started = Instant::now();
        let request = self.client.get(target.clone()).send();

        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(ProbeFailure::Timeout),
            Ok(Err(e)) => return Err(ProbeFailure::Network(e.to_string())),
            Err(_) => return Err(ProbeFailure::Timeout),
        };

        let status = response.status();
        if status.is_success() {
            Ok(ProbeSuccess {
                latency: started.elapsed(),
            })
        } else {
            Err(ProbeFailure::Status(status.as_u16()))
        }
    }
}
