//! # Error Types
//!
//! Errors shared across the parcel crates. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Most of the tracking pipeline is total: identifier extraction, carrier
//! detection and status normalization return safe defaults instead of
//! errors. The types here cover the few places where a caller may want to
//! know *why* a value was rejected, even if the pipeline itself degrades
//! gracefully.

use thiserror::Error;

/// Top-level error type for the foundational parcel types.
#[derive(Error, Debug)]
pub enum ParcelError {
    /// An identifier did not match the format of the requested carrier.
    #[error("identifier {value:?} is not a valid {carrier} identifier")]
    InvalidIdentifier {
        /// Carrier whose format was checked.
        carrier: String,
        /// The rejected value.
        value: String,
    },

    /// A carrier name was not recognized.
    #[error("unknown carrier: {0:?}")]
    UnknownCarrier(String),

    /// A milestone name was not recognized.
    #[error("unknown milestone: {0:?}")]
    UnknownMilestone(String),

    /// A timestamp could not be parsed.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// Error while reading a provider timestamp.
///
/// Never fatal to a tracking lookup: an event whose timestamp fails to parse
/// is ranked as "unknown recency" by the event selector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The timestamp field was present but empty.
    #[error("timestamp is empty")]
    Empty,

    /// None of the accepted formats matched.
    #[error("unparsable timestamp {0:?}")]
    Unparsable(String),
}
