//! Error types for charset detection.
//!
//! Detection itself never fails: invalid input is a verdict, not an error.
//! These variants cover model initialization, configuration and I/O.

use thiserror::Error;

/// Error variants for detector construction and reader-driven detection.
#[derive(Debug, Error)]
pub enum Error {
    /// An embedded model table could not be decoded or violates its invariants.
    #[error("malformed model table: {0}")]
    MalformedTable(&'static str),

    /// A decoded table does not have the length its model declares.
    #[error("table length mismatch: expected {expected}, decoded {actual}")]
    TableLength {
        /// Length the model requires.
        expected: usize,
        /// Length actually produced by the decoder.
        actual: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while reading input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for detector operations.
pub type Result<T> = std::result::Result<T, Error>;
