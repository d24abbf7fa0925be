//! # Tracking Normalization Pipeline
//!
//! Runs the whole chain for one provider response:
//!
//! ```text
//! response ─► Tracking ─► identifiers ─► carrier ─► latest event
//!                                                        │
//!                         NormalizedTracking ◄─ label + ETA estimate
//! ```
//!
//! Each run is pure given the response and the cached rule table held by
//! the [`EtaEstimator`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use parcel_core::{display_label, Carrier};
use parcel_eta::{EtaEstimator, EtaQuery, RuleIdentity};

use crate::detect::{detect_carrier, CarrierHints};
use crate::error::TrackingError;
use crate::events::pick_latest_event;
use crate::extract::carrier_identifiers;
use crate::response::{Tracking, TrackingEvent};

/// How the caller looked the shipment up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// By tracking number.
    #[default]
    Tracking,
    /// By order reference (the provider's client tracker id).
    Order,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tracking => "tracking",
            Self::Order => "order",
        }
    }
}

impl std::fmt::Display for LookupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupMode {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracking" => Ok(Self::Tracking),
            "order" => Ok(Self::Order),
            other => Err(TrackingError::UnknownLookupMode(other.to_string())),
        }
    }
}

/// One event as presented to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub datetime: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub courier_code: Option<String>,
}

impl From<&TrackingEvent> for NormalizedEvent {
    fn from(event: &TrackingEvent) -> Self {
        Self {
            datetime: event.timestamp.clone(),
            location: event.location.clone(),
            status: event.status.clone(),
            courier_code: event.courier_code.clone(),
        }
    }
}

/// The normalized view of one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTracking {
    pub ok: bool,
    pub mode: LookupMode,
    pub tracking_number: String,
    pub client_tracker_id: Option<String>,
    pub postnord_number: Option<String>,
    pub citymail_number: Option<String>,
    pub status_milestone: Option<String>,
    pub status_label: String,
    pub last_update: Option<String>,
    pub carrier_detected: Carrier,
    pub latest_status_text: Option<String>,
    pub latest_event_at: Option<String>,
    #[serde(rename = "estimated_delivery")]
    pub estimated_delivery: String,
    #[serde(rename = "eta_min_business_days")]
    pub eta_min_business_days: Option<u32>,
    #[serde(rename = "eta_max_business_days")]
    pub eta_max_business_days: Option<u32>,
    #[serde(rename = "eta_note")]
    pub eta_note: Option<String>,
    #[serde(rename = "eta_matched_rule")]
    pub eta_matched_rule: Option<RuleIdentity>,
    /// Events in provider order.
    pub events: Vec<NormalizedEvent>,
}

/// Normalizes provider responses using a shared ETA estimator.
#[derive(Debug, Clone)]
pub struct TrackingNormalizer {
    estimator: EtaEstimator,
}

impl TrackingNormalizer {
    pub fn new(estimator: EtaEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &EtaEstimator {
        &self.estimator
    }

    /// Normalize `response` for a lookup of `requested` in `mode`.
    ///
    /// `requested` is reported as the tracking number when the response
    /// carries none, and then also drives carrier detection.
    ///
    /// # Errors
    ///
    /// [`TrackingError::NoShipment`] when the response holds no tracking,
    /// [`TrackingError::Eta`] when the rule table cannot be loaded.
    pub fn normalize(
        &self,
        response: &Value,
        requested: &str,
        mode: LookupMode,
    ) -> Result<NormalizedTracking, TrackingError> {
        let tracking = Tracking::from_response(response).ok_or(TrackingError::NoShipment)?;

        let identifiers = carrier_identifiers(&tracking, response);
        // Tracker number, then shipment number, then the looked-up value.
        let tracking_number = tracking
            .primary_tracking_number()
            .unwrap_or(requested.trim())
            .to_string();
        let primary = Some(tracking_number.as_str()).filter(|tn| !tn.is_empty());
        let carrier = detect_carrier(&CarrierHints::new(&identifiers, primary));

        let latest = pick_latest_event(&tracking.events);
        let latest_status_text = latest.and_then(|e| e.status.as_deref());
        let milestone = tracking.milestone();

        let eta = self.estimator.estimate(&EtaQuery {
            carrier: carrier.as_str(),
            latest_status_text: latest_status_text.unwrap_or_default(),
            milestone,
        })?;

        tracing::info!(
            tracking_number = %tracking_number,
            carrier = %carrier,
            mode = %mode,
            events = tracking.events.len(),
            rule_based = eta.is_rule_based(),
            "tracking normalized"
        );

        Ok(NormalizedTracking {
            ok: true,
            mode,
            tracking_number,
            client_tracker_id: tracking.tracker.client_tracker_id.clone(),
            postnord_number: identifiers.postnord.map(|id| id.into_inner()),
            citymail_number: identifiers.citymail.map(|id| id.into_inner()),
            status_milestone: milestone.map(str::to_string),
            status_label: display_label(milestone).to_string(),
            last_update: tracking.metadata.generated_at.clone(),
            carrier_detected: carrier,
            latest_status_text: latest_status_text.map(str::to_string),
            latest_event_at: latest.and_then(|e| e.timestamp.clone()),
            estimated_delivery: eta.estimated_delivery,
            eta_min_business_days: eta.eta_min_business_days,
            eta_max_business_days: eta.eta_max_business_days,
            eta_note: eta.eta_note,
            eta_matched_rule: eta.matched_rule,
            events: tracking.events.iter().map(NormalizedEvent::from).collect(),
        })
    }
}
