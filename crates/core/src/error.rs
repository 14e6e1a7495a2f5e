//! Error types for aedif-core

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can abort a single target build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(#[from] aedif_platform::PlatformError),

    /// An invariant the configuration layer guarantees was violated
    /// anyway. Never expected in correct operation.
    #[error("internal error while building '{target}': {invariant}")]
    Internal { target: String, invariant: String },
}
