//! Dynamic rest buffers between consecutive events.
//!
//! For each adjacent pair of events (sorted by start time), the event that
//! finishes first gets a recommended recovery buffer sized by its type and
//! priority. When the natural gap to the next event falls short, the
//! shortfall is emitted as a [`BufferRecommendation`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{Event, sorted_well_formed};
use crate::event_type::EventType;
use crate::time::{day_key, minutes_between};
use crate::types::{EventId, Priority};

/// Days with more events than this are flagged.
const BUSY_DAY_EVENTS: usize = 6;
/// More emitted buffers than this means the schedule is packed.
const PACKED_BUFFER_COUNT: usize = 5;
/// More critical-priority events than this are flagged as clustered.
const CRITICAL_CLUSTER: usize = 3;

/// Priority escalation: critical events get 30% more rest, high ones 10%.
const CRITICAL_ESCALATION: f64 = 1.3;
const HIGH_ESCALATION: f64 = 1.1;

/// Invalid buffer configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BufferConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("min_buffer_minutes ({min}) exceeds max_buffer_minutes ({max})")]
    MinAboveMax { min: f64, max: f64 },
}

/// Tunable buffer sizing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Rest after a class or personal event.
    pub base_buffer_minutes: f64,
    pub exam_multiplier: f64,
    pub project_multiplier: f64,
    pub work_multiplier: f64,
    pub max_buffer_minutes: f64,
    pub min_buffer_minutes: f64,
    /// Scale the buffer up after high (x1.1) and critical (x1.3) priority events.
    ///
    /// Off by default: inputs on the 1-5 scale never reached the old
    /// 10-point escalation cutoffs, so the default policy sizes buffers by
    /// event type alone.
    pub priority_escalation: bool,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            base_buffer_minutes: 15.0,
            exam_multiplier: 3.0,    // 45 minutes after exams
            project_multiplier: 2.0, // 30 minutes after projects
            work_multiplier: 1.5,    // 22.5 minutes after work
            max_buffer_minutes: 120.0,
            min_buffer_minutes: 5.0,
            priority_escalation: false,
        }
    }
}

impl BufferConfig {
    pub fn validate(&self) -> Result<(), BufferConfigError> {
        let fields = [
            ("base_buffer_minutes", self.base_buffer_minutes),
            ("exam_multiplier", self.exam_multiplier),
            ("project_multiplier", self.project_multiplier),
            ("work_multiplier", self.work_multiplier),
            ("max_buffer_minutes", self.max_buffer_minutes),
            ("min_buffer_minutes", self.min_buffer_minutes),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(BufferConfigError::NotPositive { field, value });
            }
        }
        if self.min_buffer_minutes > self.max_buffer_minutes {
            return Err(BufferConfigError::MinAboveMax {
                min: self.min_buffer_minutes,
                max: self.max_buffer_minutes,
            });
        }
        Ok(())
    }

    /// Multiplier applied to the base buffer after an event.
    pub fn multiplier_for(&self, event_type: EventType, priority: Priority) -> f64 {
        let by_type = match event_type {
            EventType::Exam => self.exam_multiplier,
            EventType::Project => self.project_multiplier,
            EventType::Work => self.work_multiplier,
            EventType::Class | EventType::Personal => 1.0,
        };
        let escalation = match (self.priority_escalation, priority) {
            (true, p) if p >= Priority::CRITICAL => CRITICAL_ESCALATION,
            (true, p) if p >= Priority::HIGH => HIGH_ESCALATION,
            _ => 1.0,
        };
        by_type * escalation
    }

    /// Recommended rest after an event, clamped to the configured range.
    pub fn recommended_minutes(&self, event_type: EventType, priority: Priority) -> f64 {
        (self.base_buffer_minutes * self.multiplier_for(event_type, priority))
            .clamp(self.min_buffer_minutes, self.max_buffer_minutes)
    }
}

/// Extra rest recommended after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferRecommendation {
    pub after_event_id: EventId,
    /// Shortfall between the recommended buffer and the actual gap.
    pub duration_minutes: u32,
    pub reason: String,
}

/// Computes buffers for every adjacent pair of events.
///
/// The caller pre-filters `events` to the range of interest. Overlapping
/// events count as a zero gap. Events that do not end after they start are
/// skipped.
pub fn compute_dynamic_buffers(
    events: &[Event],
    config: &BufferConfig,
) -> Result<Vec<BufferRecommendation>, BufferConfigError> {
    config.validate()?;

    let sorted = sorted_well_formed(events);
    let buffers: Vec<BufferRecommendation> = sorted
        .windows(2)
        .filter_map(|pair| {
            let (current, next) = (pair[0], pair[1]);
            let gap = minutes_between(current.end_time, next.start_time).max(0.0);
            let recommended = config.recommended_minutes(current.event_type, current.priority);
            if gap >= recommended {
                return None;
            }

            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "shortfall is positive and bounded by max_buffer_minutes"
            )]
            let duration_minutes = ((recommended - gap).round() as u32).max(1);

            Some(BufferRecommendation {
                after_event_id: current.id.clone(),
                duration_minutes,
                reason: format!(
                    "Buffer after {} (priority {})",
                    current.event_type, current.priority
                ),
            })
        })
        .collect();

    tracing::debug!(
        events = sorted.len(),
        buffers = buffers.len(),
        "computed dynamic buffers"
    );
    Ok(buffers)
}

/// Per-day load figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRisk {
    pub event_count: usize,
    /// Events on this day that received a buffer.
    pub buffered_events: usize,
}

/// Events the buffer engine considers; malformed ones are skipped there too.
fn well_formed(events: &[Event]) -> impl Iterator<Item = &Event> {
    events.iter().filter(|event| event.is_well_formed())
}

/// Groups events by the calendar day they start on and counts buffered ones.
///
/// Events that do not end after they start are left out.
pub fn risk_metrics(
    events: &[Event],
    buffers: &[BufferRecommendation],
) -> BTreeMap<NaiveDate, DayRisk> {
    let mut per_day: BTreeMap<NaiveDate, DayRisk> = BTreeMap::new();
    for event in well_formed(events) {
        per_day.entry(day_key(event.start_time)).or_default().event_count += 1;
    }

    for buffer in buffers {
        let day = well_formed(events)
            .find(|event| event.id == buffer.after_event_id)
            .map(|event| day_key(event.start_time));
        if let Some(risk) = day.and_then(|day| per_day.get_mut(&day)) {
            risk.buffered_events += 1;
        }
    }

    per_day
}

/// Advisory messages derived from the events and their computed buffers.
pub fn buffer_recommendations(events: &[Event], buffers: &[BufferRecommendation]) -> Vec<String> {
    let mut recommendations: Vec<String> = risk_metrics(events, buffers)
        .iter()
        .filter(|(_, risk)| risk.event_count > BUSY_DAY_EVENTS)
        .map(|(day, risk)| {
            format!(
                "Consider reducing the load on {day}: {} activities scheduled",
                risk.event_count
            )
        })
        .collect();

    if buffers.len() > PACKED_BUFFER_COUNT {
        recommendations.push(
            "Your schedule has many back-to-back events. Add more space between tasks."
                .to_string(),
        );
    }

    let critical = well_formed(events)
        .filter(|event| event.priority >= Priority::CRITICAL)
        .count();
    if critical > CRITICAL_CLUSTER {
        recommendations.push(
            "You have many critical-priority items. Consider spreading them out.".to_string(),
        );
    }

    recommendations
}
