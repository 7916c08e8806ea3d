//! Simulation and hardware-device error types.

use std::io;
use std::path::PathBuf;

use gatling_netlist::NetlistError;

/// Errors that can occur while loading gate files or running the simulation.
///
/// Load errors surface before the first step. Hardware failures terminate a
/// running simulation deliberately; the terminal is restored on every path.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A gate file could not be loaded.
    #[error("cannot load gate file `{path}`: {source}")]
    Load {
        /// The offending file.
        path: PathBuf,
        /// The underlying format or I/O error.
        #[source]
        source: NetlistError,
    },

    /// The host input stream reached genuine end-of-stream.
    #[error("host input stream closed")]
    InputClosed,

    /// The quit byte arrived on the host input stream.
    #[error("quit requested from host input")]
    QuitRequested,

    /// Reading from or writing to the host streams failed.
    #[error("host I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SimError {
    /// Returns `true` if this error is a deliberate operator-initiated stop
    /// rather than a fault.
    pub fn is_quit(&self) -> bool {
        matches!(self, SimError::QuitRequested)
    }
}
