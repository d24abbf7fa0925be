//! # Notification Classification
//!
//! Maps the latest event of a tracking to the kind of customer message it
//! warrants and decides whether that message is still due. Sending is left
//! to the caller.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;
use crate::events::pick_latest_event;
use crate::response::Tracking;

/// The customer message a status change warrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TrackingCreated,
    InTransit,
    PickupReady,
    Delivered,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrackingCreated => "tracking_created",
            Self::InTransit => "in_transit",
            Self::PickupReady => "pickup_ready",
            Self::Delivered => "delivered",
        }
    }

    /// Classify a provider status code, category or milestone.
    ///
    /// Checks run in order: `delivered`, then `pickup` / `out_for_delivery`,
    /// then `transit`, then `created`.
    pub fn classify(status: &str) -> Option<Self> {
        let status = status.trim().to_ascii_lowercase();
        if status.is_empty() {
            None
        } else if status.contains("delivered") {
            Some(Self::Delivered)
        } else if status.contains("pickup") || status.contains("out_for_delivery") {
            Some(Self::PickupReady)
        } else if status.contains("transit") {
            Some(Self::InTransit)
        } else if status.contains("created") {
            Some(Self::TrackingCreated)
        } else {
            None
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tracking_created" => Ok(Self::TrackingCreated),
            "in_transit" => Ok(Self::InTransit),
            "pickup_ready" => Ok(Self::PickupReady),
            "delivered" => Ok(Self::Delivered),
            other => Err(TrackingError::UnknownNotificationKind(other.to_string())),
        }
    }
}

/// The outcome of classifying a tracking for notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDecision {
    /// The status string that was classified.
    pub status: Option<String>,
    pub kind: Option<NotificationKind>,
    pub due: bool,
}

/// The status string used for classification: the latest event's
/// `statusCode`, else `statusCategory`, else `statusMilestone`.
pub fn notification_status(tracking: &Tracking) -> Option<&str> {
    let latest = pick_latest_event(&tracking.events)?;
    [
        latest.status_code.as_deref(),
        latest.status_category.as_deref(),
        latest.status_milestone.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.trim().is_empty())
}

/// Classify `tracking` and compare against the last kind already sent.
pub fn decide_notification(
    tracking: &Tracking,
    last_notified: Option<NotificationKind>,
) -> NotificationDecision {
    let status = notification_status(tracking);
    let kind = status.and_then(NotificationKind::classify);
    let due = kind.is_some() && kind != last_notified;

    tracing::debug!(
        status = status.unwrap_or_default(),
        kind = kind.map(|k| k.as_str()).unwrap_or("none"),
        due,
        "notification classified"
    );

    NotificationDecision {
        status: status.map(str::to_string),
        kind,
        due,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::TrackingEvent;

    fn tracking_with(events: Vec<TrackingEvent>) -> Tracking {
        Tracking {
            events,
            ..Tracking::default()
        }
    }

    fn coded(timestamp: &str, code: &str) -> TrackingEvent {
        TrackingEvent {
            timestamp: Some(timestamp.to_string()),
            status_code: Some(code.to_string()),
            ..TrackingEvent::default()
        }
    }

    #[test]
    fn classify_known_codes() {
        use NotificationKind::*;
        assert_eq!(NotificationKind::classify("delivery_delivered"), Some(Delivered));
        assert_eq!(NotificationKind::classify("delivery_out_for_delivery"), Some(PickupReady));
        assert_eq!(NotificationKind::classify("delivery_ready_for_pickup"), Some(PickupReady));
        assert_eq!(NotificationKind::classify("transit_pickup"), Some(PickupReady));
        assert_eq!(NotificationKind::classify("in_transit"), Some(InTransit));
        assert_eq!(NotificationKind::classify("info_tracking_created"), Some(TrackingCreated));
        assert_eq!(NotificationKind::classify("exception"), None);
        assert_eq!(NotificationKind::classify(""), None);
    }

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [
            NotificationKind::TrackingCreated,
            NotificationKind::InTransit,
            NotificationKind::PickupReady,
            NotificationKind::Delivered,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
        assert!(matches!(
            "shipped".parse::<NotificationKind>(),
            Err(TrackingError::UnknownNotificationKind(ref k)) if k == "shipped"
        ));
    }

    #[test]
    fn latest_event_drives_classification() {
        let tracking = tracking_with(vec![
            coded("2024-01-02T00:00:00Z", "delivery_delivered"),
            coded("2024-01-01T00:00:00Z", "transit"),
        ]);
        let decision = decide_notification(&tracking, None);
        assert_eq!(decision.kind, Some(NotificationKind::Delivered));
        assert_eq!(decision.status.as_deref(), Some("delivery_delivered"));
        assert!(decision.due);
    }

    #[test]
    fn category_is_used_without_code() {
        let tracking = tracking_with(vec![TrackingEvent {
            status_category: Some("transit".into()),
            ..TrackingEvent::default()
        }]);
        assert_eq!(notification_status(&tracking), Some("transit"));
    }

    #[test]
    fn same_kind_is_not_due_again() {
        let tracking = tracking_with(vec![coded("2024-01-01T00:00:00Z", "transit")]);
        let decision = decide_notification(&tracking, Some(NotificationKind::InTransit));
        assert_eq!(decision.kind, Some(NotificationKind::InTransit));
        assert!(!decision.due);
    }

    #[test]
    fn no_events_means_nothing_due() {
        let decision = decide_notification(&Tracking::default(), None);
        assert_eq!(decision.kind, None);
        assert!(!decision.due);
    }
}
