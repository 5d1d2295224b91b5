//! Stress estimation for a period of scheduled events.
//!
//! # Algorithm Summary (`continuous-v2`)
//!
//! 1. Select the events belonging to the window (by start time, or by overlap)
//! 2. `density` = event minutes / window minutes, clamped to \[0, 1\]
//! 3. `priority_value` = average priority rescaled from 1-5 to 0-5
//! 4. `score` = `5 * density + priority_value * (1 + density) / 2`
//! 5. Round and clamp to \[0, 10\]
//!
//! Buffer checks are diagnostic only in this algorithm: they raise
//! `has_insufficient_buffers` and a recommendation, but never the score.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{Event, sorted_well_formed};
use crate::time::{Granularity, day_key, minutes_between, period_bounds};
use crate::types::Priority;

/// Highest reportable stress level.
pub const MAX_STRESS_LEVEL: u8 = 10;

const CLEAR_SCHEDULE: &str = "Your schedule is clear! It's a great time to relax.";
const HEAVY_DENSITY: &str =
    "Your schedule is heavily booked. Consider rescheduling or delegating some tasks.";
const BACK_TO_BACK: &str =
    "You have back-to-back events. Consider adding rest time between them.";
const PRIORITY_OVERLOAD: &str =
    "Too many high-priority items. Try delegating or postponing some of them.";
const REDISTRIBUTE_WEEK: &str =
    "This week looks intense. Consider moving non-critical items to next week.";
const ALL_GOOD: &str = "Your schedule looks great! Keep it up.";

/// Errors raised before any scoring happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StressError {
    /// The window ends before it starts.
    #[error("period end {end} is before period start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The window has no duration, so density is undefined.
    #[error("period starting at {at} has zero length")]
    EmptyWindow { at: DateTime<Utc> },

    /// A configuration value is unusable.
    #[error("invalid stress configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Named scoring algorithm, echoed in every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringAlgorithm {
    /// Density plus density-amplified average priority.
    #[default]
    #[serde(rename = "continuous-v2")]
    ContinuousV2,
}

/// Which events count as belonging to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowFilter {
    /// Events whose start time is inside the inclusive window, counted in full.
    #[default]
    StartTime,
    /// Events intersecting the window, counted only for the minutes inside it.
    Overlap,
}

/// Tunable thresholds for stress estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Day view: gaps shorter than this between adjacent events are insufficient.
    pub buffer_gap_minutes: f64,
    /// Week view: a day with more scheduled minutes than this is heavy.
    pub heavy_day_minutes: f64,
    /// Week view: this many heavy days flag insufficient buffers.
    pub heavy_day_limit: usize,
    /// Events at or above this priority count as high priority.
    pub high_priority_threshold: Priority,
    /// More high-priority events than this triggers a recommendation.
    pub high_priority_limit: usize,
    /// Density above this triggers a recommendation.
    pub high_density: f64,
    /// Week view: stress at or above this suggests redistributing.
    pub redistribute_level: u8,
    pub window_filter: WindowFilter,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            buffer_gap_minutes: 15.0,
            heavy_day_minutes: 600.0, // 10 hours
            heavy_day_limit: 3,
            high_priority_threshold: Priority::HIGH,
            high_priority_limit: 3,
            high_density: 0.8,
            redistribute_level: 7,
            window_filter: WindowFilter::StartTime,
        }
    }
}

impl StressConfig {
    pub fn validate(&self) -> Result<(), StressError> {
        if !self.buffer_gap_minutes.is_finite() || self.buffer_gap_minutes < 0.0 {
            return Err(StressError::InvalidConfig(
                "buffer_gap_minutes must be a non-negative number",
            ));
        }
        if !self.heavy_day_minutes.is_finite() || self.heavy_day_minutes <= 0.0 {
            return Err(StressError::InvalidConfig(
                "heavy_day_minutes must be a positive number",
            ));
        }
        if self.heavy_day_limit == 0 {
            return Err(StressError::InvalidConfig(
                "heavy_day_limit must be at least 1",
            ));
        }
        if !(self.high_density > 0.0 && self.high_density <= 1.0) {
            return Err(StressError::InvalidConfig(
                "high_density must be in (0, 1]",
            ));
        }
        if self.redistribute_level > MAX_STRESS_LEVEL {
            return Err(StressError::InvalidConfig(
                "redistribute_level must not exceed 10",
            ));
        }
        Ok(())
    }
}

/// Result of a stress computation. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressMetrics {
    /// Integer in \[0, 10\].
    pub stress_level: u8,
    /// Fraction of the window occupied by events, in \[0, 1\].
    pub density: f64,
    pub high_priority_count: usize,
    pub has_insufficient_buffers: bool,
    /// Ordered: density, buffers, priority, weekly trend.
    pub recommendations: Vec<String>,
    pub period: Granularity,
    pub algorithm: ScoringAlgorithm,
}

impl StressMetrics {
    fn clear(period: Granularity) -> Self {
        Self {
            stress_level: 0,
            density: 0.0,
            high_priority_count: 0,
            has_insufficient_buffers: false,
            recommendations: vec![CLEAR_SCHEDULE.to_string()],
            period,
            algorithm: ScoringAlgorithm::ContinuousV2,
        }
    }

    pub const fn label(&self) -> StressLabel {
        StressLabel::from_level(self.stress_level)
    }
}

/// Coarse bucket of a stress level for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLabel {
    Low,
    Medium,
    High,
}

impl StressLabel {
    pub const fn from_level(level: u8) -> Self {
        match level {
            0..=3 => Self::Low,
            4..=6 => Self::Medium,
            _ => Self::High,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// An event selected into the window with the minutes it contributes.
struct Windowed<'a> {
    event: &'a Event,
    minutes: f64,
}

fn select_events<'a>(
    events: &'a [Event],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    filter: WindowFilter,
) -> Vec<Windowed<'a>> {
    sorted_well_formed(events)
        .into_iter()
        .filter_map(|event| match filter {
            WindowFilter::StartTime => (event.start_time >= start && event.start_time <= end)
                .then(|| Windowed {
                    event,
                    minutes: event.duration_minutes(),
                }),
            WindowFilter::Overlap => {
                let clipped_start = event.start_time.max(start);
                let clipped_end = event.end_time.min(end);
                (clipped_end > clipped_start).then(|| Windowed {
                    event,
                    minutes: minutes_between(clipped_start, clipped_end),
                })
            }
        })
        .collect()
}

/// Continuous score before rounding, in \[0, 10\] for valid inputs.
fn continuous_score(density: f64, average_priority: f64) -> f64 {
    let density_score = density * 5.0;
    let priority_value = (average_priority - 1.0) / 4.0 * 5.0;
    let multiplier = 1.0 + density;
    density_score + priority_value * multiplier / 2.0
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to [0, 10] first"
)]
fn to_level(raw: f64) -> u8 {
    raw.round().clamp(0.0, f64::from(MAX_STRESS_LEVEL)) as u8
}

/// Any adjacent pair (sorted by start) separated by less than `threshold` minutes.
fn has_tight_gap(selected: &[Windowed<'_>], threshold: f64) -> bool {
    selected.windows(2).any(|pair| {
        minutes_between(pair[0].event.end_time, pair[1].event.start_time) < threshold
    })
}

/// Number of days whose scheduled minutes exceed `heavy_minutes`.
fn heavy_day_count(selected: &[Windowed<'_>], heavy_minutes: f64) -> usize {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for item in selected {
        *per_day.entry(day_key(item.event.start_time)).or_insert(0.0) += item.minutes;
    }
    per_day.values().filter(|m| **m > heavy_minutes).count()
}

/// Computes stress metrics for the events in `[period_start, period_end]`.
///
/// Events that do not end after they start are skipped. The window must have
/// a positive length.
pub fn compute_stress_metrics(
    events: &[Event],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    period: Granularity,
    config: &StressConfig,
) -> Result<StressMetrics, StressError> {
    config.validate()?;
    if period_end < period_start {
        return Err(StressError::InvalidWindow {
            start: period_start,
            end: period_end,
        });
    }
    let period_minutes = minutes_between(period_start, period_end);
    if period_minutes <= 0.0 {
        return Err(StressError::EmptyWindow { at: period_start });
    }

    let selected = select_events(events, period_start, period_end, config.window_filter);
    if selected.is_empty() {
        tracing::debug!(%period, "no events in window");
        return Ok(StressMetrics::clear(period));
    }

    let event_minutes: f64 = selected.iter().map(|item| item.minutes).sum();
    let density = (event_minutes / period_minutes).clamp(0.0, 1.0);

    #[expect(clippy::cast_precision_loss, reason = "event counts are small")]
    let average_priority = selected
        .iter()
        .map(|item| f64::from(item.event.priority.value()))
        .sum::<f64>()
        / selected.len() as f64;

    let high_priority_count = selected
        .iter()
        .filter(|item| item.event.priority >= config.high_priority_threshold)
        .count();

    let has_insufficient_buffers = match period {
        Granularity::Day => has_tight_gap(&selected, config.buffer_gap_minutes),
        Granularity::Week => {
            heavy_day_count(&selected, config.heavy_day_minutes) >= config.heavy_day_limit
        }
        Granularity::Month | Granularity::Year => false,
    };

    let stress_level = to_level(continuous_score(density, average_priority));

    let mut recommendations = Vec::new();
    if density > config.high_density {
        recommendations.push(HEAVY_DENSITY.to_string());
    }
    if has_insufficient_buffers {
        recommendations.push(BACK_TO_BACK.to_string());
    }
    if high_priority_count > config.high_priority_limit {
        recommendations.push(PRIORITY_OVERLOAD.to_string());
    }
    if period == Granularity::Week && stress_level >= config.redistribute_level {
        recommendations.push(REDISTRIBUTE_WEEK.to_string());
    }
    if stress_level == 0 {
        recommendations.push(ALL_GOOD.to_string());
    }

    tracing::debug!(
        %period,
        events = selected.len(),
        stress_level,
        density,
        high_priority_count,
        has_insufficient_buffers,
        "computed stress metrics"
    );

    Ok(StressMetrics {
        stress_level,
        density,
        high_priority_count,
        has_insufficient_buffers,
        recommendations,
        period,
        algorithm: ScoringAlgorithm::ContinuousV2,
    })
}

/// Day-granularity metrics for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStress {
    pub date: NaiveDate,
    pub metrics: StressMetrics,
}

/// Computes day-granularity metrics for each of `days`, in parallel.
///
/// Each day uses its local-time window from [`period_bounds`]. Results keep
/// the order of `days`.
pub fn daily_breakdown(
    events: &[Event],
    days: &[NaiveDate],
    config: &StressConfig,
) -> Result<Vec<DailyStress>, StressError> {
    days.par_iter()
        .map(|&date| {
            let (start, end) = period_bounds(Granularity::Day, date);
            compute_stress_metrics(events, start, end, Granularity::Day, config)
                .map(|metrics| DailyStress { date, metrics })
        })
        .collect()
}
