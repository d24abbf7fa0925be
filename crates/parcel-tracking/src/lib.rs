//! # parcel-tracking — Tracking Response Normalization
//!
//! Turns a raw multi-carrier tracking response into the normalized view a
//! customer sees: canonical carrier identifiers, the detected last-mile
//! carrier, the latest event, a Swedish status label and a delivery
//! estimate.
//!
//! ## Architecture
//!
//! - **Response** (`response.rs`): the only module aware of provider
//!   envelope and field variants. Produces a canonical [`Tracking`].
//!
//! - **Extract** (`extract.rs`): PostNord / CityMail identifiers, from the
//!   typed tracking first and a raw-response scan as fallback.
//!
//! - **Detect** (`detect.rs`): carrier precedence rules.
//!
//! - **Events** (`events.rs`): deterministic latest-event selection.
//!
//! - **Notify** (`notify.rs`): which customer message a status warrants.
//!
//! - **Pipeline** (`pipeline.rs`): [`TrackingNormalizer`] combining all of
//!   the above with `parcel-eta`.
//!
//! ## Crate Policy
//!
//! - Extraction, detection, event selection and labelling never fail.
//! - Every failure is a [`TrackingError`].
//! - No I/O. The rule table is read through the estimator's store.

pub mod detect;
pub mod error;
pub mod events;
pub mod extract;
pub mod notify;
pub mod pipeline;
pub mod response;

pub use detect::{detect_carrier, CarrierHints};
pub use error::TrackingError;
pub use events::{events_latest_first, pick_latest_event};
pub use extract::{
    carrier_identifiers, classify_identifiers, extract_identifiers, scan_for_identifiers,
    CarrierIdentifiers,
};
pub use notify::{decide_notification, notification_status, NotificationDecision, NotificationKind};
pub use pipeline::{LookupMode, NormalizedEvent, NormalizedTracking, TrackingNormalizer};
pub use response::{Metadata, RawTrackingIdentifier, Shipment, Tracker, Tracking, TrackingEvent};
