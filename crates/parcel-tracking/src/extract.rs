//! # Carrier Identifier Extraction
//!
//! Finds the PostNord and CityMail identifiers of a shipment. The provider
//! reports secondary identifiers in several places, so extraction runs in
//! two layers:
//!
//! 1. **Structured scan** over the canonical [`Tracking`]: shipment list,
//!    tracker list, tracker number, shipment number, then event-level
//!    numbers. Values are deduplicated by trimmed text, first occurrence
//!    wins, and classified with the format rules in
//!    [`parcel_core::Carrier`].
//!
//! 2. **Fallback scan** over the raw response, used per carrier only when
//!    the structured scan found nothing for it. Every string value is
//!    tested in document order and the first match is taken. Traversal is
//!    guarded by a visited set and a depth bound.
//!
//! Extraction never fails. Absent or malformed sections contribute nothing.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use parcel_core::{CitymailId, PostnordId};

use crate::response::{RawTrackingIdentifier, Tracking};

/// Nesting depth beyond which the fallback scan stops descending.
pub const MAX_SCAN_DEPTH: usize = 64;

/// The carrier identifiers found for one shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierIdentifiers {
    pub postnord: Option<PostnordId>,
    pub citymail: Option<CitymailId>,
}

impl CarrierIdentifiers {
    pub fn is_empty(&self) -> bool {
        self.postnord.is_none() && self.citymail.is_none()
    }
}

/// Collect every identifier reported in `tracking`, deduplicated.
pub fn extract_identifiers(tracking: &Tracking) -> Vec<RawTrackingIdentifier> {
    let lists = tracking
        .shipment
        .tracking_numbers
        .iter()
        .chain(&tracking.tracker.tracking_numbers)
        .cloned();

    let singles = [
        tracking.tracker.tracking_number.as_deref(),
        tracking.shipment.tracking_number.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(RawTrackingIdentifier::new);

    let from_events = tracking.events.iter().flat_map(|event| {
        [
            event.tracking_number.as_deref(),
            event.event_tracking_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(move |value| RawTrackingIdentifier {
            value: value.to_string(),
            courier_code: event.courier_code.clone(),
            courier_name: None,
        })
    });

    let mut seen = HashSet::new();
    lists
        .chain(singles)
        .chain(from_events)
        .filter_map(|mut id| {
            let trimmed = id.value.trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
                return None;
            }
            id.value = trimmed.to_string();
            Some(id)
        })
        .collect()
}

/// Pick the PostNord and CityMail identifiers from an extracted list.
///
/// PostNord prefers the first `UJ…SE` identifier over the first `003…` one.
pub fn classify_identifiers(identifiers: &[RawTrackingIdentifier]) -> CarrierIdentifiers {
    let postnord = identifiers
        .iter()
        .filter_map(|id| PostnordId::parse(&id.value).ok())
        .min_by_key(|id| id.strength());
    let citymail = identifiers
        .iter()
        .find_map(|id| CitymailId::parse(&id.value).ok());

    CarrierIdentifiers { postnord, citymail }
}

/// Structured extraction, with the raw-response scan filling any carrier
/// the structured layer left empty.
pub fn carrier_identifiers(tracking: &Tracking, response: &Value) -> CarrierIdentifiers {
    let mut found = classify_identifiers(&extract_identifiers(tracking));
    if found.postnord.is_some() && found.citymail.is_some() {
        return found;
    }

    let scanned = scan_for_identifiers(response);
    if found.postnord.is_none() {
        if let Some(id) = &scanned.postnord {
            tracing::debug!(identifier = %id, "PostNord identifier found by fallback scan");
        }
        found.postnord = scanned.postnord;
    }
    if found.citymail.is_none() {
        if let Some(id) = &scanned.citymail {
            tracing::debug!(identifier = %id, "CityMail identifier found by fallback scan");
        }
        found.citymail = scanned.citymail;
    }
    found
}

/// Scan every string value of `response`, in document order, for the first
/// PostNord and the first CityMail identifier.
pub fn scan_for_identifiers(response: &Value) -> CarrierIdentifiers {
    let mut scan = Scan {
        visited: HashSet::new(),
        found: CarrierIdentifiers::default(),
    };
    scan.walk(response, 0);
    scan.found
}

struct Scan {
    visited: HashSet<*const Value>,
    found: CarrierIdentifiers,
}

impl Scan {
    fn done(&self) -> bool {
        self.found.postnord.is_some() && self.found.citymail.is_some()
    }

    fn walk(&mut self, value: &Value, depth: usize) {
        if self.done() {
            return;
        }
        match value {
            Value::String(s) => self.test(s),
            Value::Array(items) => {
                if !self.enter(value, depth) {
                    return;
                }
                for item in items {
                    self.walk(item, depth + 1);
                }
            }
            Value::Object(map) => {
                if !self.enter(value, depth) {
                    return;
                }
                for item in map.values() {
                    self.walk(item, depth + 1);
                }
            }
            _ => {}
        }
    }

    fn enter(&mut self, container: &Value, depth: usize) -> bool {
        if depth >= MAX_SCAN_DEPTH {
            tracing::debug!(depth, "identifier scan depth limit reached");
            return false;
        }
        self.visited.insert(container as *const Value)
    }

    fn test(&mut self, text: &str) {
        let text = text.trim();
        if self.found.postnord.is_none() && matches_pattern(postnord_pattern(), text) {
            self.found.postnord = PostnordId::parse(text).ok();
        }
        if self.found.citymail.is_none() && matches_pattern(citymail_pattern(), text) {
            self.found.citymail = CitymailId::parse(text).ok();
        }
    }
}

fn matches_pattern(pattern: Option<&Regex>, text: &str) -> bool {
    pattern.is_some_and(|re| re.is_match(text))
}

fn postnord_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(UJ)[A-Z0-9]+SE$|^(003)[0-9]+").ok())
        .as_ref()
}

fn citymail_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(BC)[A-Z0-9]+CN$").ok())
        .as_ref()
}
