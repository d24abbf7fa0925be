//! # parcel-core — Foundational Types for Parcel Tracking
//!
//! This crate is the leaf of the workspace. It defines the vocabulary that
//! every other crate speaks: which last-mile carriers exist and how their
//! identifiers look, which lifecycle milestones the tracking provider
//! reports, and how provider timestamps are read.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for carrier identifiers.** `PostnordId` and
//!    `CitymailId` can only be built through a format check, so a value of
//!    either type is already known to belong to its carrier.
//!
//! 2. **Single `Carrier` enum.** One definition, exhaustive `match`
//!    everywhere. Rule tables refer to carriers by [`Carrier::as_str()`].
//!
//! 3. **Total status mapping.** [`milestone::display_label`] never fails;
//!    unknown milestones map to a fixed "unknown status" label.
//!
//! 4. **Lenient, UTC-normalized timestamps.** [`EventTimestamp`] accepts the
//!    shapes the provider is seen to emit and normalizes them to UTC.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `parcel-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod carrier;
pub mod error;
pub mod identity;
pub mod milestone;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use carrier::{Carrier, FormatMatch};
pub use error::{ParcelError, TimestampError};
pub use identity::{CitymailId, PostnordId};
pub use milestone::{display_label, Milestone, UNKNOWN_STATUS_LABEL};
pub use temporal::EventTimestamp;
