//! Module for interpreting date-like cells and time spacing

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Fallback spacing when no positive spacing can be inferred
pub const DEFAULT_SPACING_SECONDS: i64 = 86_400;

/// Datetime formats tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Date formats tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d"];

/// Parses a text cell into a datetime.
///
/// Accepts common ISO and day-first layouts as well as year-month
/// (`2024-01`, `2024/01`), which maps to the first day of the month.
/// Returns None when nothing matches.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = s.parse::<chrono::DateTime<chrono::FixedOffset>>() {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    parse_year_month(s)
}

fn parse_year_month(s: &str) -> Option<NaiveDateTime> {
    let (year, month) = s.split_once(|c: char| c == '-' || c == '/')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

/// Dominant spacing between consecutive timestamps: the median of the
/// consecutive differences, truncated to whole seconds.
///
/// Falls back to one day if fewer than two timestamps are given or the
/// median is not positive.
pub fn dominant_spacing(timestamps: &[NaiveDateTime]) -> Duration {
    if timestamps.len() < 2 {
        return Duration::seconds(DEFAULT_SPACING_SECONDS);
    }

    let mut diffs: Vec<i64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .collect();
    diffs.sort_unstable();

    let mid = diffs.len() / 2;
    let median = if diffs.len() % 2 == 0 {
        // mean of the two middle values, truncated
        ((diffs[mid - 1] as f64 + diffs[mid] as f64) / 2.0) as i64
    } else {
        diffs[mid]
    };

    if median <= 0 {
        return Duration::seconds(DEFAULT_SPACING_SECONDS);
    }
    Duration::seconds(median)
}
