//! # Latest-Event Selection
//!
//! The provider does not guarantee event order, so the latest event is
//! chosen by timestamp rather than position:
//!
//! - events with a readable timestamp come first, most recent first;
//! - events with equal timestamps are ordered by their content, so the
//!   choice does not depend on input order;
//! - events with a missing or unreadable timestamp come last, in input
//!   order.

use std::cmp::Ordering;

use parcel_core::EventTimestamp;

use crate::response::TrackingEvent;

impl TrackingEvent {
    /// The event time, if present and readable.
    pub fn parsed_timestamp(&self) -> Option<EventTimestamp> {
        let raw = self.timestamp.as_deref()?;
        match EventTimestamp::parse(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::debug!(timestamp = %raw, error = %e, "UnparsableTimestamp");
                None
            }
        }
    }
}

/// The most recent event, or `None` for an empty list.
pub fn pick_latest_event(events: &[TrackingEvent]) -> Option<&TrackingEvent> {
    events_latest_first(events).into_iter().next()
}

/// All events ranked most recent first.
pub fn events_latest_first(events: &[TrackingEvent]) -> Vec<&TrackingEvent> {
    let mut ranked: Vec<(Option<EventTimestamp>, &TrackingEvent)> = events
        .iter()
        .map(|event| (event.parsed_timestamp(), event))
        .collect();

    // Stable sort keeps input order among events without a timestamp.
    ranked.sort_by(|(ta, a), (tb, b)| match (ta, tb) {
        (Some(ta), Some(tb)) => tb.cmp(ta).then_with(|| tie_key(a).cmp(&tie_key(b))),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked.into_iter().map(|(_, event)| event).collect()
}

type TieKey<'a> = [Option<&'a str>; 9];

fn tie_key(event: &TrackingEvent) -> TieKey<'_> {
    [
        event.status.as_deref(),
        event.location.as_deref(),
        event.courier_code.as_deref(),
        event.status_code.as_deref(),
        event.status_category.as_deref(),
        event.status_milestone.as_deref(),
        event.timestamp.as_deref(),
        event.tracking_number.as_deref(),
        event.event_tracking_number.as_deref(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: Option<&str>, status: &str) -> TrackingEvent {
        TrackingEvent {
            timestamp: timestamp.map(str::to_string),
            status: Some(status.to_string()),
            ..TrackingEvent::default()
        }
    }

    fn status(event: Option<&TrackingEvent>) -> Option<&str> {
        event.and_then(|e| e.status.as_deref())
    }

    #[test]
    fn empty_list_has_no_latest() {
        assert!(pick_latest_event(&[]).is_none());
    }

    #[test]
    fn most_recent_wins_regardless_of_position() {
        let events = vec![
            event(Some("2024-01-01T10:00:00Z"), "old"),
            event(Some("2024-01-03T10:00:00Z"), "new"),
            event(Some("2024-01-02T10:00:00Z"), "mid"),
        ];
        assert_eq!(status(pick_latest_event(&events)), Some("new"));
    }

    #[test]
    fn offsets_are_compared_as_instants() {
        let events = vec![
            event(Some("2024-01-01T12:00:00+02:00"), "ten utc"),
            event(Some("2024-01-01T11:00:00Z"), "eleven utc"),
        ];
        assert_eq!(status(pick_latest_event(&events)), Some("eleven utc"));
    }

    #[test]
    fn valid_timestamp_beats_missing() {
        let events = vec![event(None, "a"), event(Some("2020-01-01T00:00:00Z"), "b")];
        assert_eq!(status(pick_latest_event(&events)), Some("b"));
    }

    #[test]
    fn all_invalid_returns_first() {
        let events = vec![event(None, "a"), event(Some("nonsense"), "b"), event(Some(""), "c")];
        assert_eq!(status(pick_latest_event(&events)), Some("a"));
    }

    #[test]
    fn invalid_events_trail_in_input_order() {
        let events = vec![
            event(Some("bad"), "x"),
            event(Some("2024-01-01"), "dated"),
            event(None, "y"),
        ];
        let ranked: Vec<_> = events_latest_first(&events)
            .into_iter()
            .filter_map(|e| e.status.as_deref())
            .collect();
        assert_eq!(ranked, vec!["dated", "x", "y"]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_content() {
        let forward = vec![
            event(Some("2024-01-01T10:00:00Z"), "b"),
            event(Some("2024-01-01T10:00:00Z"), "a"),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(pick_latest_event(&forward), pick_latest_event(&reversed));
        assert_eq!(status(pick_latest_event(&forward)), Some("a"));
    }

    #[test]
    fn occurrence_and_naive_formats_are_readable() {
        let events = vec![
            event(Some("2024-01-01 09:00:00"), "naive"),
            event(Some("2024-01-01T08:00:00.500"), "fractional"),
        ];
        assert_eq!(status(pick_latest_event(&events)), Some("naive"));
    }
}
