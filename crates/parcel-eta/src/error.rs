//! # ETA Errors
//!
//! Only a broken rule table is fatal. Without rules there is nothing to
//! estimate from, so [`EtaError::ConfigLoad`] propagates to the caller.
//! A bad *row* only costs that row ([`RuleRowError`]).

use thiserror::Error;

/// Errors raised while obtaining the rule table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EtaError {
    /// The rule source is missing, unreadable or structurally malformed.
    #[error("failed to load ETA rules from {source_name}: {reason}")]
    ConfigLoad {
        /// Human-readable name of the rule source (usually a path).
        source_name: String,
        /// Why the load failed.
        reason: String,
    },
}

/// Why a single rule row was excluded from the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleRowError {
    /// The `carrier` column is empty after trimming.
    #[error("rule row has no carrier")]
    MissingCarrier,

    /// The `match_value` column is empty after trimming.
    #[error("rule row has no match_value")]
    MissingMatchValue,
}
