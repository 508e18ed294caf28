//! Error types for the browser test harness.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for bootstrap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A script or spec file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error outside of file reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source transformer rejected a spec.
    #[error("transform failed: {0}")]
    Transform(String),

    /// A configured browser has no launcher registered.
    #[error("no launcher registered for browser '{0}'")]
    UnknownBrowser(String),

    /// A plugin failed while registering hooks.
    #[error("plugin '{name}' failed: {reason}")]
    Plugin { name: String, reason: String },

    /// Browser launcher failure.
    #[error("launcher error: {0}")]
    Launcher(String),

    /// Test server failure.
    #[error("server error: {0}")]
    Server(String),

    /// Test runner failure.
    #[error("runner error: {0}")]
    Runner(String),

    /// Harness configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;
