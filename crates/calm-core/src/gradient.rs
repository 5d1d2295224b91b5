//! Display helper mapping a stress level onto a two-colour gradient.

use std::fmt;

use serde::Serialize;

use crate::stress::MAX_STRESS_LEVEL;

/// Colour of the unfilled part of the track.
pub const TRACK_COLOR: &str = "rgba(200,200,200,0.1)";

/// A single colour stop at a percentage along the gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub color: String,
    pub percent: f64,
}

/// Left-to-right gradient filled from `low` to `high` up to the stress level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressGradient {
    pub stops: Vec<ColorStop>,
}

/// Builds the gradient for `level` (clamped to 0-10).
pub fn stress_gradient(level: u8, color_low: &str, color_high: &str) -> StressGradient {
    let percent = f64::from(level.min(MAX_STRESS_LEVEL)) * 100.0 / f64::from(MAX_STRESS_LEVEL);
    let stop = |color: &str, percent: f64| ColorStop {
        color: color.to_string(),
        percent,
    };
    StressGradient {
        stops: vec![
            stop(color_low, 0.0),
            stop(color_high, percent),
            stop(TRACK_COLOR, percent),
            stop(TRACK_COLOR, 100.0),
        ],
    }
}

impl fmt::Display for StressGradient {
    /// Renders as a CSS `linear-gradient`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linear-gradient(to right")?;
        for stop in &self.stops {
            write!(f, ", {} {}%", stop.color, stop.percent)?;
        }
        write!(f, ")")
    }
}
