//! Stress command for estimating how demanding a period is.
//!
//! This module implements `calm stress` for day, week, month and year
//! periods, with an optional day-by-day breakdown and JSON output.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use calm_core::{
    DailyStress, Event, Granularity, StressGradient, StressLabel, StressMetrics,
    compute_stress_metrics, daily_breakdown, days_in_range, first_day_of_period,
    last_day_of_period, period_bounds, stress_gradient,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::util::{load_events, parse_date};
use crate::Config;

/// Computed stress report.
#[derive(Debug)]
pub struct StressReport {
    pub period: Granularity,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub metrics: StressMetrics,
    pub gradient: StressGradient,
    /// Empty unless a breakdown was requested.
    pub daily: Vec<DailyStress>,
}

// ========== Report Generation ==========

/// Computes the report for the period containing `date`.
pub fn generate_report(
    events: &[Event],
    period: Granularity,
    date: NaiveDate,
    daily: bool,
    config: &Config,
) -> Result<StressReport> {
    let (start, end) = period_bounds(period, date);
    let metrics = compute_stress_metrics(events, start, end, period, &config.stress)?;

    let first_day = first_day_of_period(period, date);
    let last_day = last_day_of_period(period, date);
    let daily = if daily {
        daily_breakdown(events, &days_in_range(first_day, last_day), &config.stress)?
    } else {
        Vec::new()
    };

    let gradient = stress_gradient(metrics.stress_level, &config.colors.low, &config.colors.high);

    Ok(StressReport {
        period,
        first_day,
        last_day,
        metrics,
        gradient,
        daily,
    })
}

// ========== Text Output ==========

/// Generates a 10-character bar, one block per stress point.
pub fn level_bar(level: u8) -> String {
    let filled = usize::from(level.min(10));
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "density is clamped to [0, 1]"
)]
fn percent(density: f64) -> i64 {
    (density * 100.0).round() as i64
}

/// Formats the period description for the report header.
fn format_period_description(period: Granularity, first_day: NaiveDate) -> String {
    match period {
        Granularity::Day => first_day.format("%A, %b %-d, %Y").to_string(),
        Granularity::Week => format!("Week of {}", first_day.format("%b %-d, %Y")),
        Granularity::Month => first_day.format("%B %Y").to_string(),
        Granularity::Year => first_day.format("%Y").to_string(),
    }
}

/// Formats the human-readable report output.
pub fn format_report(report: &StressReport) -> String {
    let mut output = String::new();
    let metrics = &report.metrics;

    let description = format_period_description(report.period, report.first_day);
    writeln!(output, "STRESS REPORT: {description}").unwrap();
    writeln!(output).unwrap();

    writeln!(
        output,
        "Level:          {}/10 ({})  {}",
        metrics.stress_level,
        metrics.label().as_str(),
        level_bar(metrics.stress_level)
    )
    .unwrap();
    writeln!(output, "Density:        {}%", percent(metrics.density)).unwrap();
    writeln!(
        output,
        "High priority:  {} events",
        metrics.high_priority_count
    )
    .unwrap();
    let buffers = if metrics.has_insufficient_buffers {
        "insufficient"
    } else {
        "ok"
    };
    writeln!(output, "Buffers:        {buffers}").unwrap();

    writeln!(output).unwrap();
    writeln!(output, "RECOMMENDATIONS").unwrap();
    writeln!(output, "───────────────").unwrap();
    if metrics.recommendations.is_empty() {
        writeln!(output, "(none)").unwrap();
    }
    for recommendation in &metrics.recommendations {
        writeln!(output, "- {recommendation}").unwrap();
    }

    if !report.daily.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "BY DAY").unwrap();
        writeln!(output, "──────").unwrap();
        for day in &report.daily {
            let date = day.date.format("%a %b %-d").to_string();
            let level = day.metrics.stress_level;
            let label = day.metrics.label().as_str();
            let bar = level_bar(level);
            let density = percent(day.metrics.density);
            writeln!(output, "{date:<10}  {level:>2}/10 {label:<6}  {bar}  {density:>3}%")
                .unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub period: JsonPeriod,
    pub label: StressLabel,
    pub gradient: String,
    pub metrics: &'a StressMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub daily: Vec<JsonDay>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub period_type: Granularity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDay {
    pub date: String,
    pub stress_level: u8,
    pub label: StressLabel,
    pub density: f64,
    pub has_insufficient_buffers: bool,
}

/// Formats report data as JSON.
pub fn format_report_json(report: &StressReport) -> Result<String> {
    let json = JsonReport {
        period: JsonPeriod {
            start: report.first_day.format("%Y-%m-%d").to_string(),
            end: report.last_day.format("%Y-%m-%d").to_string(),
            period_type: report.period,
        },
        label: report.metrics.label(),
        gradient: report.gradient.to_string(),
        metrics: &report.metrics,
        daily: report
            .daily
            .iter()
            .map(|day| JsonDay {
                date: day.date.format("%Y-%m-%d").to_string(),
                stress_level: day.metrics.stress_level,
                label: day.metrics.label(),
                density: day.metrics.density,
                has_insufficient_buffers: day.metrics.has_insufficient_buffers,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the stress command.
pub fn run<W: Write>(
    writer: &mut W,
    events_path: &Path,
    period: Granularity,
    date: Option<&str>,
    daily: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let today = Local::now().date_naive();
    let date = date.map_or(Ok(today), |s| parse_date(s, today))?;
    let events = load_events(events_path)?;

    let report = generate_report(&events, period, date, daily, config)?;

    if json {
        writeln!(writer, "{}", format_report_json(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calm_core::{EventId, EventType, Priority, ScoringAlgorithm};
    use chrono::{Duration, TimeZone, Utc};
    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_metrics(level: u8, density: f64) -> StressMetrics {
        StressMetrics {
            stress_level: level,
            density,
            high_priority_count: 0,
            has_insufficient_buffers: false,
            recommendations: vec![],
            period: Granularity::Day,
            algorithm: ScoringAlgorithm::ContinuousV2,
        }
    }

    fn sample_report() -> StressReport {
        let metrics = StressMetrics {
            stress_level: 6,
            density: 0.42,
            high_priority_count: 3,
            has_insufficient_buffers: true,
            recommendations: vec![
                "You have back-to-back events. Consider adding rest time between them."
                    .to_string(),
            ],
            period: Granularity::Week,
            algorithm: ScoringAlgorithm::ContinuousV2,
        };
        StressReport {
            period: Granularity::Week,
            first_day: date(2025, 3, 10),
            last_day: date(2025, 3, 16),
            gradient: stress_gradient(6, "green", "red"),
            metrics,
            daily: vec![],
        }
    }

    // ========== Formatting Tests ==========

    #[test]
    fn test_level_bar() {
        assert_eq!(level_bar(0), "░░░░░░░░░░");
        assert_eq!(level_bar(3), "███░░░░░░░");
        assert_eq!(level_bar(10), "██████████");
        assert_eq!(level_bar(12), "██████████");
    }

    #[test]
    fn test_period_descriptions() {
        let d = date(2025, 3, 10);
        assert_eq!(
            format_period_description(Granularity::Day, d),
            "Monday, Mar 10, 2025"
        );
        assert_eq!(
            format_period_description(Granularity::Week, d),
            "Week of Mar 10, 2025"
        );
        assert_eq!(
            format_period_description(Granularity::Month, date(2025, 3, 1)),
            "March 2025"
        );
        assert_eq!(
            format_period_description(Granularity::Year, date(2025, 1, 1)),
            "2025"
        );
    }

    #[test]
    fn test_report_week() {
        let output = format_report(&sample_report());
        assert_snapshot!(output, @r"
        STRESS REPORT: Week of Mar 10, 2025

        Level:          6/10 (Medium)  ██████░░░░
        Density:        42%
        High priority:  3 events
        Buffers:        insufficient

        RECOMMENDATIONS
        ───────────────
        - You have back-to-back events. Consider adding rest time between them.
        ");
    }

    #[test]
    fn test_report_with_daily_breakdown() {
        let mut report = sample_report();
        report.metrics.recommendations.clear();
        report.daily = vec![
            DailyStress {
                date: date(2025, 3, 10),
                metrics: sample_metrics(3, 0.25),
            },
            DailyStress {
                date: date(2025, 3, 11),
                metrics: sample_metrics(10, 1.0),
            },
        ];

        let output = format_report(&report);
        assert_snapshot!(output, @r"
        STRESS REPORT: Week of Mar 10, 2025

        Level:          6/10 (Medium)  ██████░░░░
        Density:        42%
        High priority:  3 events
        Buffers:        insufficient

        RECOMMENDATIONS
        ───────────────
        (none)

        BY DAY
        ──────
        Mon Mar 10   3/10 Low     ███░░░░░░░   25%
        Tue Mar 11  10/10 High    ██████████  100%
        ");
    }

    #[test]
    fn test_report_json_output() {
        let output = format_report_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["period"]["type"], "week");
        assert_eq!(value["period"]["start"], "2025-03-10");
        assert_eq!(value["period"]["end"], "2025-03-16");
        assert_eq!(value["label"], "medium");
        assert_eq!(value["metrics"]["stressLevel"], 6);
        assert_eq!(value["metrics"]["algorithm"], "continuous-v2");
        assert!(
            value["gradient"]
                .as_str()
                .unwrap()
                .starts_with("linear-gradient(to right, green 0%, red 60%")
        );
        assert!(value.get("daily").is_none());
    }

    // ========== Generation Tests ==========

    #[test]
    fn test_generate_report_for_empty_day() {
        let report = generate_report(
            &[],
            Granularity::Day,
            date(2025, 3, 10),
            false,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(report.metrics.stress_level, 0);
        assert_eq!(report.metrics.recommendations.len(), 1);
        assert_eq!(report.first_day, report.last_day);
        assert!(report.daily.is_empty());
    }

    #[test]
    fn test_generate_report_daily_covers_whole_week() {
        // Noon UTC keeps the event on the same local day in any timezone
        // within +/-11 hours.
        let start = Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap();
        let event = Event::new(
            EventId::new("exam").unwrap(),
            EventType::Exam,
            Priority::CRITICAL,
            start,
            start + Duration::minutes(30),
        );

        let report = generate_report(
            &[event],
            Granularity::Week,
            date(2025, 3, 12),
            true,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(report.first_day, date(2025, 3, 10));
        assert_eq!(report.daily.len(), 7);
        assert_eq!(report.daily[0].date, date(2025, 3, 10));
        assert_eq!(report.daily[6].date, date(2025, 3, 16));
        assert_eq!(report.metrics.high_priority_count, 1);
        assert_eq!(report.daily[2].metrics.high_priority_count, 1);
        assert_eq!(report.daily[0].metrics.high_priority_count, 0);
    }
}
