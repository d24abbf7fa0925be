//! # Tracking Error Types
//!
//! Errors from normalizing a tracking response. Extraction, detection,
//! event selection and status labelling are total, so only two things can
//! go wrong: the response holds no tracking, or the ETA rule table cannot
//! be loaded. Parsing a lookup mode or notification kind from text reports
//! the unrecognized value.

use thiserror::Error;

use parcel_eta::EtaError;

#[derive(Error, Debug)]
pub enum TrackingError {
    /// The response contained no tracking object.
    #[error("no shipment found in tracking response")]
    NoShipment,

    /// ETA estimation failed because the rule table could not be loaded.
    #[error(transparent)]
    Eta(#[from] EtaError),

    /// Text that names no [`LookupMode`](crate::LookupMode).
    #[error("unknown lookup mode: {0:?}")]
    UnknownLookupMode(String),

    /// Text that names no [`NotificationKind`](crate::NotificationKind).
    #[error("unknown notification kind: {0:?}")]
    UnknownNotificationKind(String),
}
