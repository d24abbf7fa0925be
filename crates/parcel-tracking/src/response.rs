//! # Provider Response Normalization
//!
//! The tracking provider's JSON varies between endpoints and API revisions.
//! This module is the only place that knows about those variants; it turns
//! any of them into one canonical [`Tracking`] consumed by the rest of the
//! crate.
//!
//! ## Accepted Envelopes
//!
//! | Shape | Source |
//! |-------|--------|
//! | `{ "data": { "trackings": [ … ] } }` | track / search endpoints |
//! | `{ "data": { "trackers": [ … ] } }` | tracker endpoints |
//! | `{ "data": [ … ] }` | bulk results |
//! | `{ "trackings": [ … ] }` | unwrapped payload |
//! | `{ "tracker": …, "shipment": …, "events": … }` | a single tracking |
//!
//! The first tracking in a list is used; its `metadata` falls back to the
//! envelope's. An element without `tracker`,
//! `shipment` or `events` but with a `trackingNumber` is read as a bare
//! tracker.
//!
//! ## Field Variants
//!
//! - `events` or `trackingEvents`
//! - event time in `datetime` or `occurrenceDatetime`
//! - secondary identifiers as strings, `{ "tn": … }` or
//!   `{ "trackingNumber": … }`
//!
//! ## Tolerance
//!
//! Scalar fields of the wrong type read as absent; numbers are kept as
//! their decimal text. A section that is not an object contributes its
//! defaults. List elements that cannot be read are skipped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A secondary tracking identifier as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTrackingIdentifier {
    pub value: String,
    pub courier_code: Option<String>,
    pub courier_name: Option<String>,
}

impl RawTrackingIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::new(s.clone())),
            Value::Number(n) => Some(Self::new(n.to_string())),
            Value::Object(obj) => {
                let tn = ["tn", "trackingNumber"]
                    .iter()
                    .find_map(|key| scalar_text(obj.get(*key)))?;
                Some(Self {
                    value: tn,
                    courier_code: scalar_text(obj.get("courierCode")),
                    courier_name: scalar_text(obj.get("courierName")),
                })
            }
            _ => None,
        }
    }
}

/// Tracker-level data: the provider's handle on a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tracking_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_tracker_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_milestone: Option<String>,
    #[serde(default, deserialize_with = "identifier_list")]
    pub tracking_numbers: Vec<RawTrackingIdentifier>,
}

/// Shipment-level data as aggregated by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tracking_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_milestone: Option<String>,
    #[serde(default, deserialize_with = "identifier_list")]
    pub tracking_numbers: Vec<RawTrackingIdentifier>,
}

/// One tracking event. Provider order is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingEvent {
    pub timestamp: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub courier_code: Option<String>,
    pub status_code: Option<String>,
    pub status_category: Option<String>,
    pub status_milestone: Option<String>,
    pub tracking_number: Option<String>,
    pub event_tracking_number: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    occurrence_datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    courier_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status_milestone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    tracking_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    event_tracking_number: Option<String>,
}

impl From<RawEvent> for TrackingEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            timestamp: non_blank(raw.datetime).or_else(|| non_blank(raw.occurrence_datetime)),
            status: raw.status,
            location: raw.location,
            courier_code: raw.courier_code,
            status_code: raw.status_code,
            status_category: raw.status_category,
            status_milestone: raw.status_milestone,
            tracking_number: raw.tracking_number,
            event_tracking_number: raw.event_tracking_number,
        }
    }
}

/// Response metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub generated_at: Option<String>,
}

/// The canonical shape of one tracking result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tracking {
    pub tracker: Tracker,
    pub shipment: Shipment,
    pub events: Vec<TrackingEvent>,
    pub metadata: Metadata,
}

impl Tracking {
    /// Locate and normalize the first tracking in a provider response.
    ///
    /// Returns `None` when the response holds no tracking at all.
    pub fn from_response(response: &Value) -> Option<Self> {
        let element = locate_tracking(response)?;
        let obj = element.as_object()?;

        if !has_any(obj, &["tracker", "shipment", "events", "trackingEvents"]) {
            return obj
                .contains_key("trackingNumber")
                .then(|| Self {
                    tracker: section(Some(element), "tracker"),
                    ..Self::default()
                });
        }

        let events_value = obj.get("events").or_else(|| obj.get("trackingEvents"));
        Some(Self {
            tracker: section(obj.get("tracker"), "tracker"),
            shipment: section(obj.get("shipment"), "shipment"),
            events: events(events_value),
            metadata: section(
                obj.get("metadata").or_else(|| response.get("metadata")),
                "metadata",
            ),
        })
    }

    /// Shipment milestone, falling back to the tracker's.
    pub fn milestone(&self) -> Option<&str> {
        self.shipment
            .status_milestone
            .as_deref()
            .or(self.tracker.status_milestone.as_deref())
    }

    /// Tracker number, then shipment number.
    pub fn primary_tracking_number(&self) -> Option<&str> {
        self.tracker
            .tracking_number
            .as_deref()
            .or(self.shipment.tracking_number.as_deref())
            .filter(|tn| !tn.trim().is_empty())
    }
}

fn locate_tracking(response: &Value) -> Option<&Value> {
    let obj = response.as_object()?;

    if let Some(data) = obj.get("data") {
        match data {
            Value::Array(items) => return items.first(),
            Value::Object(inner) => {
                if let Some(first) = first_of(inner, &["trackings", "trackers"]) {
                    return Some(first);
                }
                if has_any(inner, &["tracker", "shipment", "events", "trackingEvents"]) {
                    return Some(data);
                }
            }
            _ => {}
        }
    }

    if let Some(first) = first_of(obj, &["trackings", "trackers"]) {
        return Some(first);
    }

    has_any(obj, &["tracker", "shipment", "events", "trackingEvents"]).then_some(response)
}

fn first_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
        .and_then(|items| items.first())
}

fn has_any(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| obj.contains_key(*key))
}

fn section<T: DeserializeOwned + Default>(value: Option<&Value>, name: &str) -> T {
    match value {
        None | Some(Value::Null) => T::default(),
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
            tracing::debug!(section = name, error = %e, "unreadable response section, using defaults");
            T::default()
        }),
    }
}

fn events(value: Option<&Value>) -> Vec<TrackingEvent> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawEvent>(item.clone()) {
            Ok(raw) => Some(TrackingEvent::from(raw)),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable tracking event");
                None
            }
        })
        .collect()
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.trim().is_empty())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(scalar_text(value.as_ref()))
}

fn identifier_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RawTrackingIdentifier>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(RawTrackingIdentifier::from_value)
            .collect(),
        _ => Vec::new(),
    })
}
