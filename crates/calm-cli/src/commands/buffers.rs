//! Buffers command for suggesting rest time between events.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use calm_core::{
    BufferRecommendation, DayRisk, Event, buffer_recommendations, compute_dynamic_buffers,
    risk_metrics,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::util::load_events;
use crate::Config;

/// Buffers plus the advice derived from them.
#[derive(Debug, Serialize)]
pub struct BufferReport {
    pub buffers: Vec<BufferRecommendation>,
    pub recommendations: Vec<String>,
    pub days: BTreeMap<NaiveDate, DayRisk>,
}

/// Computes buffers and derived advice for all supplied events.
pub fn generate_report(events: &[Event], config: &Config) -> Result<BufferReport> {
    let buffers = compute_dynamic_buffers(events, &config.buffers)?;
    let recommendations = buffer_recommendations(events, &buffers);
    let days = risk_metrics(events, &buffers);
    Ok(BufferReport {
        buffers,
        recommendations,
        days,
    })
}

/// Formats minutes as "Xh Ym" from one hour, "Xm" below.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours >= 1 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Formats the human-readable buffer report.
pub fn format_report(report: &BufferReport) -> String {
    let mut output = String::new();

    if report.buffers.is_empty() {
        writeln!(output, "No extra buffers needed.").unwrap();
    } else {
        let total: u64 = report
            .buffers
            .iter()
            .map(|b| u64::from(b.duration_minutes))
            .sum();
        writeln!(
            output,
            "SUGGESTED BUFFERS ({}, {} total)",
            report.buffers.len(),
            format_minutes(total)
        )
        .unwrap();
        writeln!(output, "─────────────────").unwrap();
        for buffer in &report.buffers {
            writeln!(
                output,
                "+{:<7} after {:<16} {}",
                format_minutes(u64::from(buffer.duration_minutes)),
                buffer.after_event_id.as_str(),
                buffer.reason
            )
            .unwrap();
        }
    }

    if !report.recommendations.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "RECOMMENDATIONS").unwrap();
        writeln!(output, "───────────────").unwrap();
        for recommendation in &report.recommendations {
            writeln!(output, "- {recommendation}").unwrap();
        }
    }

    output
}

/// Runs the buffers command.
pub fn run<W: Write>(writer: &mut W, events_path: &Path, json: bool, config: &Config) -> Result<()> {
    let events = load_events(events_path)?;
    let report = generate_report(&events, config)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }

    Ok(())
}
