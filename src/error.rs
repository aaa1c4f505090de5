use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the fpmon library.
#[derive(Error, Debug)]
pub enum FpmonError {
    /// No fping executable could be located.
    #[error("fping not found: {0}")]
    FpingNotFound(String),
    /// The fping process could not be started.
    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A session was requested without any target host.
    #[error("no hosts to monitor")]
    NoHosts,
    /// Invalid configuration value.
    #[error("config: {0}")]
    Config(String),
    /// Underlying IO error, including reads from the fping output stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Other error cases.
    #[error("other: {0}")]
    Other(String),
}
