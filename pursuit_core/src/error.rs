//! Core error type.
//!
//! Only construction-time failures surface as errors: socket bind and
//! destination resolution. Steady-path transport failures are counted by
//! their owners and never propagate.

use thiserror::Error;

/// Fatal construction/runtime errors for the control core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A local socket could not be bound.
    #[error("failed to bind UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The viewer destination address did not resolve.
    #[error("invalid viewer destination {dest}: {source}")]
    BadDestination {
        dest: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration rejected by validation.
    #[error(transparent)]
    Config(#[from] pursuit_common::config::ConfigError),
}
