//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use calm_core::Event;
use chrono::{Duration, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a date string as ISO 8601, a keyword, or a relative date.
///
/// Supports:
/// - ISO 8601: "2026-01-15"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15), 'today', or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;

    let days_per_unit = match &caps[2] {
        "day" => 1,
        "week" => 7,
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if n > MAX_RELATIVE_DAYS / days_per_unit {
        anyhow::bail!("Relative date too far back: {n} {}", &caps[2]);
    }

    Ok(today - Duration::days(n * days_per_unit))
}

/// Load a JSON array of events from a file, or from stdin when `path` is `-`.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read events from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    parse_events(&content).with_context(|| format!("invalid events in {}", path.display()))
}

/// Parse a JSON array of events.
pub fn parse_events(content: &str) -> anyhow::Result<Vec<Event>> {
    let events: Vec<Event> = serde_json::from_str(content)?;
    tracing::debug!(count = events.len(), "loaded events");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2024-02-29", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
        );
    }

    #[test]
    fn parses_relative_dates() {
        assert_eq!(
            parse_date("3 days ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert_eq!(
            parse_date("1 week ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
        );
    }

    #[test]
    fn rejects_garbage_and_huge_offsets() {
        assert!(parse_date("next tuesday", today()).is_err());
        assert!(parse_date("2025-13-01", today()).is_err());
        assert!(parse_date("99999999 weeks ago", today()).is_err());
    }

    #[test]
    fn parse_events_reads_array() {
        let events = parse_events(
            r#"[{"id":"a","type":"class","priority":2,
                 "start_time":"2025-03-10T09:00:00Z","end_time":"2025-03-10T10:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_str(), "a");
    }

    #[test]
    fn parse_events_rejects_bad_priority() {
        let result = parse_events(
            r#"[{"id":"a","type":"class","priority":7,
                 "start_time":"2025-03-10T09:00:00Z","end_time":"2025-03-10T10:00:00Z"}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_events_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_events(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
