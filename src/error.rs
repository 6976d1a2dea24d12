//! Error types for dendrite learning.
//!
//! The learning engine itself is closed-form numeric code, so the taxonomy is
//! small: bad configuration rejected up front, a weight update that would
//! divide by a zero weight, and the usual input/IO failures at the edges.

use thiserror::Error;

/// The main error type for dendrite learning operations.
#[derive(Error, Debug)]
pub enum DendriteError {
    /// A configuration value would make the computation undefined
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A weight update would divide by a weight of exactly zero
    #[error("Degenerate weight at synapse (sensor {sensor}, detector {detector}): weight is 0")]
    DegenerateWeight {
        /// Sensor slot of the offending synapse
        sensor: usize,
        /// Detector class of the offending synapse
        detector: usize,
    },

    /// Input size does not match expected size
    #[error("Invalid input size: expected {expected}, got {actual}")]
    InvalidInputSize {
        /// Expected size
        expected: usize,
        /// Actual size received
        actual: usize,
    },

    /// Character is not part of the symbol alphabet
    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(char),

    /// Symbol index is not below the alphabet size
    #[error("Symbol index {symbol} outside alphabet of {alphabet_len} symbols")]
    SymbolOutOfRange {
        /// Offending symbol index
        symbol: usize,
        /// Number of symbols in the alphabet
        alphabet_len: usize,
    },

    /// Patch id does not exist in the controller
    #[error("Unknown patch: {0}")]
    UnknownPatch(usize),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error occurred
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized `Result` type for dendrite learning operations.
pub type Result<T> = std::result::Result<T, DendriteError>;
