//! Errors raised while reading or writing binary gate files.

use std::io;

/// Errors that can occur while loading or writing a gate file.
///
/// All load errors surface before simulation begins; a netlist is either
/// loaded completely or not at all.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// Underlying I/O failure.
    #[error("gate file I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reserved malformed sentinel appeared where a value was expected.
    #[error("malformed sentinel at value {position} of gate file")]
    MalformedSentinel {
        /// Zero-based index of the offending 32-bit value.
        position: u64,
    },

    /// The end sentinel appeared inside a triple rather than at a boundary.
    #[error("end sentinel inside a gate triple at value {position}")]
    TruncatedTriple {
        /// Zero-based index of the offending 32-bit value.
        position: u64,
    },

    /// The file ended without an end sentinel, or mid-value.
    #[error("gate file ended without end sentinel")]
    UnexpectedEof,

    /// A wire index above [`Wire::MAX_INDEX`](crate::Wire::MAX_INDEX) cannot
    /// be written, as it would collide with the reserved sentinels.
    #[error("wire index {index} collides with reserved sentinel values")]
    WireIndexReserved {
        /// The offending wire index.
        index: u32,
    },
}
