use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Placeholder shown for any time or date the catalog does not provide
pub const TBA: &str = "TBA";

/// Minutes in a day, the upper bound of any time window
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Represents the start or end of a meeting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeetingTime {
    /// A specific wall-clock time
    At(NaiveTime),
    /// To be announced
    #[default]
    TBA,
}

impl MeetingTime {
    /// Parses a compact 24-hour time as the catalog stores it (`"1330"`, `"800"`).
    ///
    /// The last two digits are minutes and everything before them is the hour.
    /// Anything shorter than three characters, non-numeric, or not a real clock
    /// time is TBA.
    pub fn from_compact(raw: &str) -> Self {
        parse_compact(raw).map_or(Self::TBA, Self::At)
    }

    /// Minutes since midnight, or `None` for TBA
    pub fn minutes(self) -> Option<u32> {
        match self {
            Self::At(time) => Some(minutes_since_midnight(time)),
            Self::TBA => None,
        }
    }
}

impl Display for MeetingTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::At(time) => write!(f, "{}", time.format("%-I:%M %p")),
            Self::TBA => write!(f, "{TBA}"),
        }
    }
}

impl Serialize for MeetingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_compact(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.len() < 3 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = raw.split_at(raw.len() - 2);
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Formats a compact 24-hour catalog time for display, e.g. `"1330"` as `"1:30 PM"`
pub fn format_time(raw: &str) -> String {
    MeetingTime::from_compact(raw).to_string()
}

/// Parses a 24-hour `H:MM` clock reading such as a time input submits (`"8:00"`, `"13:30"`).
/// Trailing seconds are ignored.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let mut parts = s.trim().split(':');
    let hours = parts.next()?.trim().parse().ok()?;
    let minutes = parts.next()?.trim().parse().ok()?;

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Converts a displayed 12-hour time (`"1:30 PM"`) to minutes since midnight.
///
/// Returns -1 for `"TBA"` and for anything that is not a 12-hour reading.
pub fn time_to_minutes(display: &str) -> i32 {
    parse_twelve_hour(display)
        .map(|time| minutes_since_midnight(time) as i32)
        .unwrap_or(-1)
}

fn parse_twelve_hour(display: &str) -> Option<NaiveTime> {
    let (clock, period) = display.trim().split_once(' ')?;
    let (hours, minutes) = clock.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;

    if !(1..=12).contains(&hours) {
        return None;
    }

    let hours = match period.trim() {
        "AM" => hours % 12,
        "PM" => hours % 12 + 12,
        _ => return None,
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Renders a meeting date the way the catalog displays it, `M/D/YYYY` or TBA
pub fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| TBA.to_owned(), |d| d.format("%-m/%-d/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("1330"), "1:30 PM");
        assert_eq!(format_time("800"), "8:00 AM");
        assert_eq!(format_time("0800"), "8:00 AM");
        assert_eq!(format_time("1200"), "12:00 PM");
        assert_eq!(format_time("0005"), "12:05 AM");
    }

    #[test]
    fn test_format_time_tba() {
        assert_eq!(format_time(""), "TBA");
        assert_eq!(format_time("12"), "TBA");
        assert_eq!(format_time("ab30"), "TBA");
        assert_eq!(format_time("2500"), "TBA");
        assert_eq!(format_time("1275"), "TBA");
    }

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("12:00 AM"), 0);
        assert_eq!(time_to_minutes("12:00 PM"), 720);
        assert_eq!(time_to_minutes("1:30 PM"), 810);
        assert_eq!(time_to_minutes("8:00 AM"), 480);
        assert_eq!(time_to_minutes("TBA"), -1);
        assert_eq!(time_to_minutes("13:00 PM"), -1);
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["800", "1330", "1200", "0000", "2359"] {
            let time = MeetingTime::from_compact(raw);
            assert_eq!(
                time_to_minutes(&time.to_string()),
                time.minutes().unwrap() as i32
            );
        }
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("8:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse_clock("13:30"), NaiveTime::from_hms_opt(13, 30, 0));
        assert_eq!(parse_clock("09:15:00"), NaiveTime::from_hms_opt(9, 15, 0));
        assert_eq!(parse_clock("noon"), None);
        assert_eq!(parse_clock("24:00"), None);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(MeetingTime::from_compact("1330").minutes(), Some(810));
        assert_eq!(MeetingTime::TBA.minutes(), None);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(NaiveDate::from_ymd_opt(2025, 1, 6)), "1/6/2025");
        assert_eq!(display_date(None), "TBA");
    }
}
