use thiserror::Error;

/// Outcome of a single failed reachability probe.
///
/// These are expected, recoverable failures: they drive the failure tracker
/// and the connection state machine rather than aborting the monitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("probe timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeFailure),

    /// `wait_for_connection` expired before the service became reachable.
    ///
    /// Recoverable: the caller may simply wait again.
    #[error("timed out after {waited_ms} ms waiting for connection")]
    WaitTimeout { waited_ms: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
