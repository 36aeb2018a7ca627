use crate::domain::market_data::TimeInterval;
use crate::formatting::PLACEHOLDER;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DAY_SECS: u64 = 86_400;
const WEEK_SECS: u64 = 7 * DAY_SECS;
const MONTH_SECS: u64 = 30 * DAY_SECS;

/// Parse a bucket label into UTC. Accepts RFC 3339, naive ISO date-times,
/// bare dates and numeric epochs (seconds or milliseconds).
pub fn parse_time_label(label: &str) -> Option<DateTime<Utc>> {
    let label = label.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(label, pattern) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    let epoch: i64 = label.parse().ok()?;
    if epoch > 100_000_000_000 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

/// Axis label for a candle bucket.
///
/// - intraday intervals -> `HH:MM`
/// - daily and longer -> `YYYY-MM-DD`
///
/// Labels that cannot be parsed are shown as-is.
pub fn format_time_label(label: &str, interval: TimeInterval) -> String {
    match parse_time_label(label) {
        Some(dt) if interval.is_intraday() => dt.format("%H:%M").to_string(),
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => label.to_string(),
    }
}

/// `Mar 5, 2024` in UTC. Zero and missing timestamps render as the placeholder.
pub fn format_date(unix_secs: Option<u64>) -> String {
    unix_secs
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(i64::try_from(secs).ok()?, 0))
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `5h ago`, `3d ago`, `2w ago`, falling back to [`format_date`] past 30 days.
pub fn format_date_relative(unix_secs: Option<u64>, now_secs: u64) -> String {
    let Some(ts) = unix_secs.filter(|secs| *secs > 0) else {
        return PLACEHOLDER.to_string();
    };
    let diff = now_secs.saturating_sub(ts);
    if diff < DAY_SECS {
        format!("{}h ago", diff / 3600)
    } else if diff < WEEK_SECS {
        format!("{}d ago", diff / DAY_SECS)
    } else if diff < MONTH_SECS {
        format!("{}w ago", diff / WEEK_SECS)
    } else {
        format_date(Some(ts))
    }
}

/// `HH:MM:SS` UTC wall clock for "last updated" stamps.
pub fn format_clock(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-05T14:30:00Z
    const TS: u64 = 1_709_649_000;

    #[test]
    fn label_follows_interval() {
        assert_eq!(format_time_label("2024-03-05T14:30:00Z", TimeInterval::OneHour), "14:30");
        assert_eq!(format_time_label("2024-03-05T14:30:00", TimeInterval::OneDay), "2024-03-05");
        assert_eq!(format_time_label("2024-03-05", TimeInterval::OneDay), "2024-03-05");
        assert_eq!(format_time_label(&TS.to_string(), TimeInterval::FifteenMinutes), "14:30");
        assert_eq!(format_time_label("Mon", TimeInterval::OneHour), "Mon");
    }

    #[test]
    fn dates_in_utc() {
        assert_eq!(format_date(Some(TS)), "Mar 5, 2024");
        assert_eq!(format_date(Some(0)), PLACEHOLDER);
        assert_eq!(format_date(None), PLACEHOLDER);
    }

    #[test]
    fn relative_dates() {
        assert_eq!(format_date_relative(Some(TS), TS + 5 * 3600), "5h ago");
        assert_eq!(format_date_relative(Some(TS), TS + 3 * DAY_SECS), "3d ago");
        assert_eq!(format_date_relative(Some(TS), TS + 15 * DAY_SECS), "2w ago");
        assert_eq!(format_date_relative(Some(TS), TS + 45 * DAY_SECS), "Mar 5, 2024");
        assert_eq!(format_date_relative(None, TS), PLACEHOLDER);
    }

    #[test]
    fn clock_time() {
        assert_eq!(format_clock(TS * 1000 + 7_000), "14:30:07");
    }
}
