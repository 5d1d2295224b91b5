//! Time-boxed calendar events consumed by the stress and buffer engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_type::EventType;
use crate::time::minutes_between;
use crate::types::{EventId, Priority};

/// A scheduled commitment supplied by the caller.
///
/// Events are read-only to the engines. Timestamps are RFC 3339 on the wire
/// and `end_time > start_time` is expected; events violating that are
/// skipped by the engines rather than rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable reference used to correlate buffers back to events.
    pub id: EventId,
    /// What kind of commitment this is.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Priority on the 1-5 scale.
    pub priority: Priority,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Display-only title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display-only description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    pub const fn new(
        id: EventId,
        event_type: EventType,
        priority: Priority,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            event_type,
            priority,
            start_time,
            end_time,
            title: None,
            description: None,
        }
    }

    /// Duration in fractional minutes. Negative for inverted events.
    pub fn duration_minutes(&self) -> f64 {
        minutes_between(self.start_time, self.end_time)
    }

    /// Whether the event ends strictly after it starts.
    pub fn is_well_formed(&self) -> bool {
        self.end_time > self.start_time
    }
}

/// Returns the well-formed events sorted ascending by start time.
///
/// Inverted and zero-length events are dropped with a warning. The sort is
/// stable, so events sharing a start time keep their input order.
pub(crate) fn sorted_well_formed(events: &[Event]) -> Vec<&Event> {
    let mut kept: Vec<&Event> = events
        .iter()
        .filter(|event| {
            let ok = event.is_well_formed();
            if !ok {
                tracing::warn!(
                    event_id = %event.id,
                    start = %event.start_time,
                    end = %event.end_time,
                    "skipping event that does not end after it starts"
                );
            }
            ok
        })
        .collect();
    kept.sort_by_key(|event| event.start_time);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    fn event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::new(
            EventId::new(id).unwrap(),
            EventType::Class,
            Priority::default(),
            start,
            end,
        )
    }

    #[test]
    fn event_deserializes_from_wire_shape() {
        let json = r#"{
            "id": "evt-1",
            "type": "exam",
            "priority": 5,
            "start_time": "2025-03-10T09:00:00Z",
            "end_time": "2025-03-10T11:30:00Z",
            "description": "Linear algebra final"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.id.as_str(), "evt-1");
        assert_eq!(event.event_type, EventType::Exam);
        assert_eq!(event.priority, Priority::CRITICAL);
        assert!((event.duration_minutes() - 150.0).abs() < f64::EPSILON);
        assert_eq!(event.description.as_deref(), Some("Linear algebra final"));
        assert!(event.title.is_none());
    }

    #[test]
    fn event_rejects_out_of_scale_priority() {
        let json = r#"{
            "id": "evt-1",
            "type": "work",
            "priority": 9,
            "start_time": "2025-03-10T09:00:00Z",
            "end_time": "2025-03-10T10:00:00Z"
        }"#;
        let result: Result<Event, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn event_rejects_unparseable_timestamp() {
        let json = r#"{
            "id": "evt-1",
            "type": "work",
            "priority": 2,
            "start_time": "tomorrow morning",
            "end_time": "2025-03-10T10:00:00Z"
        }"#;
        let result: Result<Event, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn duration_is_fractional_minutes() {
        let start = at(9, 0);
        let end = start + chrono::Duration::seconds(90);
        assert!((event("a", start, end).duration_minutes() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sorted_well_formed_drops_inverted_and_zero_length() {
        let events = vec![
            event("late", at(14, 0), at(15, 0)),
            event("inverted", at(12, 0), at(11, 0)),
            event("zero", at(13, 0), at(13, 0)),
            event("early", at(8, 0), at(9, 0)),
        ];

        let ids: Vec<&str> = sorted_well_formed(&events)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }
}
