//! # Carrier Detection
//!
//! Decides which last-mile carrier handles a shipment. Extracted carrier
//! identifiers outrank the format of the primary tracking number:
//!
//! 1. a CityMail identifier was extracted → `citymail`
//! 2. a PostNord identifier was extracted → `postnord`
//! 3. the primary number has CityMail format → `citymail`
//! 4. the primary number has PostNord format → `postnord`
//! 5. otherwise → `unknown`

use parcel_core::Carrier;

use crate::extract::CarrierIdentifiers;

/// Everything detection looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarrierHints<'a> {
    pub citymail_id: Option<&'a str>,
    pub postnord_id: Option<&'a str>,
    pub primary_tracking_number: Option<&'a str>,
}

impl<'a> CarrierHints<'a> {
    pub fn new(identifiers: &'a CarrierIdentifiers, primary_tracking_number: Option<&'a str>) -> Self {
        Self {
            citymail_id: identifiers.citymail.as_ref().map(|id| id.as_str()),
            postnord_id: identifiers.postnord.as_ref().map(|id| id.as_str()),
            primary_tracking_number,
        }
    }
}

/// Detect the carrier. Never fails; [`Carrier::Unknown`] is the fallback.
pub fn detect_carrier(hints: &CarrierHints<'_>) -> Carrier {
    let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());

    if present(hints.citymail_id) {
        return Carrier::Citymail;
    }
    if present(hints.postnord_id) {
        return Carrier::Postnord;
    }

    let primary = hints.primary_tracking_number.unwrap_or_default();
    if Carrier::Citymail.matches_format(primary) {
        Carrier::Citymail
    } else if Carrier::Postnord.matches_format(primary) {
        Carrier::Postnord
    } else {
        Carrier::Unknown
    }
}
