//! Upwatch - Connection health monitoring for remote HTTP services.
//!
//! This crate tracks whether a single remote service is reachable: a
//! periodic probe schedule, consecutive-failure accounting, and callbacks
//! that fire only when the reachability actually changes.
//!
//! # Architecture
//!
//! One [`Monitor`] handle owns one probe schedule:
//!
//! - **[`probe`]** - The [`Probe`] trait (one reachability check) and the
//!   built-in [`HttpProbe`] (GET, 2xx counts as reachable). Targets come
//!   from a [`TargetResolver`], re-resolved on every tick.
//! - **[`state`]** - The two-valued [`ConnectionStatus`] with edge
//!   detection, so repeated failures produce one notification, not many.
//! - **[`monitor`]** - The scheduler: fixed-delay ticks, at most one probe
//!   in flight, a generation counter that makes results from a superseded
//!   activation inert, and the bounded
//!   [`wait_for_connection`](Monitor::wait_for_connection) primitive.
//!
//! # Modules
//!
//! - [`config`] - [`MonitorConfig`] with TOML loading and validation
//! - [`error`] - Error types for the crate
//! - [`monitor`] - The [`Monitor`] handle and its scheduler loop
//! - [`probe`] - Probe and target-resolver traits, HTTP implementation
//! - [`state`] - Connection status and its transition function
//! - [`subscribers`] - Transition callbacks and [`SubscriptionId`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use upwatch::{HttpProbe, Monitor, MonitorConfig, ProbeFailure};
//! use url::Url;
//!
//! # async fn run() -> upwatch::Result<()> {
//! let config = MonitorConfig::default();
//! let probe = HttpProbe::new(config.probe_timeout())
//!     .map_err(|e| ProbeFailure::Network(e.to_string()))?;
//! let monitor = Monitor::new(
//!     config,
//!     Arc::new(probe),
//!     Arc::new(|| Url::parse("http://127.0.0.1:8080/api/health").unwrap()),
//! )?;
//!
//! monitor.subscribe(|connected| tracing::info!(connected, "reachability changed"));
//! monitor.start();
//! monitor.wait_for_connection(Duration::from_secs(30)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod state;
pub mod subscribers;

mod tracker;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use config::MonitorConfig;
pub use error::{ConfigError, Error, ProbeFailure, Result};
pub use monitor::Monitor;
pub use probe::{HttpProbe, Probe, ProbeResult, ProbeSuccess, TargetResolver};
pub use state::ConnectionStatus;
pub use subscribers::SubscriptionId;
