//! Game-time formatting: StatsAPI timestamps come in several textual shapes
//! (with seconds, with fractional seconds, bare date). An ordered parse table
//! is tried in sequence; a bare date means the start time is not yet known.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const TIME_TBD: &str = "Time TBD";

/// 12-hour clock, no leading zero on the hour, tz abbreviation via chrono-tz.
const DISPLAY_FORMAT: &str = "%a %b %d, %-I:%M %p %Z";
const DATE_ONLY_DISPLAY: &str = "%a %b %d (Time TBD)";

enum Pattern {
    DateTime(&'static str),
    DateOnly(&'static str),
}

/// Tried in order; first match wins.
const PATTERNS: [Pattern; 3] = [
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    Pattern::DateOnly("%Y-%m-%d"),
];

/// Convert a raw UTC game-time value into a localized display string.
///
/// A trailing "Z" is stripped before parsing. Full timestamps are interpreted
/// as UTC and converted to `tz`; bare dates render with a "(Time TBD)"
/// placeholder. Unparseable input degrades to `"Time TBD"` — this function
/// never fails.
pub fn format_game_time(raw: Option<&str>, tz: Tz) -> String {
    let Some(raw) = raw else {
        return TIME_TBD.to_owned();
    };
    let trimmed = raw.strip_suffix('Z').unwrap_or(raw);

    for pattern in &PATTERNS {
        match pattern {
            Pattern::DateTime(fmt) => {
                if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                    let local = Utc.from_utc_datetime(&naive).with_timezone(&tz);
                    return local.format(DISPLAY_FORMAT).to_string();
                }
            }
            Pattern::DateOnly(fmt) => {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                    return date.format(DATE_ONLY_DISPLAY).to_string();
                }
            }
        }
    }

    // Last resort: salvage the date portion before any time separator.
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format(DATE_ONLY_DISPLAY).to_string(),
        Err(_) => TIME_TBD.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Chicago;

    #[test]
    fn full_timestamp_converts_to_central_time() {
        let out = format_game_time(Some("2024-05-20T23:10:00Z"), Chicago);
        assert_eq!(out, "Mon May 20, 6:10 PM CDT");
    }

    #[test]
    fn fractional_seconds_parse_too() {
        let out = format_game_time(Some("2024-05-20T23:10:00.000Z"), Chicago);
        assert_eq!(out, "Mon May 20, 6:10 PM CDT");
    }

    #[test]
    fn winter_games_pick_up_standard_time() {
        let out = format_game_time(Some("2024-01-15T20:00:00Z"), Chicago);
        assert!(out.ends_with("CST"), "expected CST suffix, got: {out}");
    }

    #[test]
    fn bare_date_renders_time_tbd_placeholder() {
        let out = format_game_time(Some("2024-05-20"), Chicago);
        assert_eq!(out, "Mon May 20 (Time TBD)");
    }

    #[test]
    fn missing_input_degrades_to_sentinel() {
        assert_eq!(format_game_time(None, Chicago), "Time TBD");
    }

    #[test]
    fn garbage_input_degrades_to_sentinel() {
        assert_eq!(format_game_time(Some("not-a-date"), Chicago), "Time TBD");
        assert_eq!(format_game_time(Some(""), Chicago), "Time TBD");
    }

    #[test]
    fn broken_time_portion_salvages_the_date() {
        let out = format_game_time(Some("2024-07-04Tlate"), Chicago);
        assert_eq!(out, "Thu Jul 04 (Time TBD)");
    }

    #[test]
    fn hour_has_no_leading_zero() {
        // 14:05 UTC -> 9:05 AM CDT
        let out = format_game_time(Some("2024-05-20T14:05:00Z"), Chicago);
        assert_eq!(out, "Mon May 20, 9:05 AM CDT");
    }
}
