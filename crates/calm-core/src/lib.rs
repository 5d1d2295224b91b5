//! Core schedule analysis for competing time commitments.
//!
//! This crate contains the pure computations for:
//! - Stress estimation: a bounded 0-10 score with density and priority diagnostics
//! - Dynamic buffers: recommended rest after events whose trailing gap is too short
//! - Shared date helpers and display gradients

pub mod buffer;
pub mod event;
pub mod event_type;
pub mod gradient;
pub mod stress;
pub mod time;
pub mod types;

pub use buffer::{
    BufferConfig, BufferConfigError, BufferRecommendation, DayRisk, buffer_recommendations,
    compute_dynamic_buffers, risk_metrics,
};
pub use event::Event;
pub use event_type::{EventType, UnknownEventType};
pub use gradient::{ColorStop, StressGradient, stress_gradient};
pub use stress::{
    DailyStress, ScoringAlgorithm, StressConfig, StressError, StressLabel, StressMetrics,
    WindowFilter, compute_stress_metrics, daily_breakdown,
};
pub use time::{
    Granularity, days_in_range, first_day_of_period, last_day_of_period, period_bounds,
};
pub use types::{EventId, Priority, ValidationError};
