use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveTime};

use super::{CandidateEntry, DiagnosticSink};
use crate::models::{Diagnostic, LaunchRecord};

const FULL_DATE: &str = "%B %d, %Y";
const YEARLESS_DATE: &str = "%B %d";
const CLOCK_TIME: &str = "%H:%M";

/// Zone abbreviations accepted after the clock time. Both mean UTC.
const UTC_ZONES: [&str; 2] = ["UTC", "GMT"];

/// Turn one candidate into a record, or report why it was dropped.
///
/// Date, mission and location are checked before the time so a dropped entry
/// yields exactly one diagnostic.
pub(super) fn resolve<S>(
    entry: CandidateEntry,
    current_year: i32,
    sink: &mut S,
) -> Option<LaunchRecord>
where
    S: DiagnosticSink + ?Sized,
{
    let Some(raw_date) = entry.date else {
        sink.report(Diagnostic::MissingDateMarker);
        return None;
    };
    let date_str = strip_qualifier(&raw_date);

    let Some(date) = parse_date(date_str, current_year) else {
        sink.report(Diagnostic::UnrecognizedDate {
            date: date_str.to_string(),
        });
        return None;
    };

    let Some(mission) = entry.mission else {
        sink.report(Diagnostic::MissingMission {
            date: date_str.to_string(),
        });
        return None;
    };

    let Some(location) = entry.location else {
        sink.report(Diagnostic::MissingLocation {
            date: date_str.to_string(),
        });
        return None;
    };

    let time = match entry.time {
        None => {
            sink.report(Diagnostic::MissingTime {
                date: date_str.to_string(),
            });
            NaiveTime::MIN
        }
        Some(time_str) => parse_time(&time_str).unwrap_or_else(|| {
            sink.report(Diagnostic::UnrecognizedTime {
                date: date_str.to_string(),
                time: time_str.clone(),
            });
            NaiveTime::MIN
        }),
    };

    Some(LaunchRecord {
        datetime: date.and_time(time),
        mission,
        location,
    })
}

/// Drop a leading `NET` ("not earlier than") qualifier and trailing whitespace.
///
/// The qualifier is discarded: a NET date is published like a confirmed one.
pub fn strip_qualifier(raw: &str) -> &str {
    let trimmed = raw.trim_end();
    match trimmed.strip_prefix("NET") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => trimmed,
    }
}

/// Parse `Month Day, Year`, falling back to `Month Day` in `current_year`.
pub fn parse_date(text: &str, current_year: i32) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, FULL_DATE) {
        return has_four_digit_year(text).then_some(date);
    }

    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(YEARLESS_DATE)).ok()?;
    parsed.set_year(i64::from(current_year)).ok()?;
    parsed.to_naive_date().ok()
}

/// `%Y` takes any number of digits; the page always writes four.
fn has_four_digit_year(text: &str) -> bool {
    text.rsplit_once(',').is_some_and(|(_, year)| {
        let year = year.trim();
        year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Parse `HH:MM ZONE` where the zone is a UTC abbreviation.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let mut parts = text.split_whitespace();
    let clock = parts.next()?;
    let zone = parts.next()?;
    if parts.next().is_some() || !UTC_ZONES.iter().any(|z| z.eq_ignore_ascii_case(zone)) {
        return None;
    }
    NaiveTime::parse_from_str(clock, CLOCK_TIME).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_net_prefix() {
        assert_eq!(strip_qualifier("NET June 5, 2025"), "June 5, 2025");
        assert_eq!(strip_qualifier("NET   June 5 \t"), "June 5");
    }

    #[test]
    fn keeps_words_that_only_start_with_net() {
        assert_eq!(strip_qualifier("NETWORK"), "NETWORK");
        assert_eq!(strip_qualifier("NET"), "NET");
    }

    #[test]
    fn parses_full_dates() {
        assert_eq!(
            parse_date("January 5, 2026", 1999),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(parse_date("Sept. 5, 2026", 1999), None);
    }

    #[test]
    fn full_dates_need_a_four_digit_year() {
        assert_eq!(parse_date("January 5, 26", 2025), None);
        assert_eq!(parse_date("June 5, 20255", 2025), None);
        assert_eq!(parse_date("June 5, 0999", 2025), NaiveDate::from_ymd_opt(999, 6, 5));
    }

    #[test]
    fn yearless_dates_use_the_given_year() {
        assert_eq!(parse_date("March 3", 2025), NaiveDate::from_ymd_opt(2025, 3, 3));
    }

    #[test]
    fn february_29_needs_a_leap_year() {
        assert_eq!(parse_date("February 29", 2028), NaiveDate::from_ymd_opt(2028, 2, 29));
        assert_eq!(parse_date("February 29", 2026), None);
    }

    #[test]
    fn rejects_unknown_date_formats() {
        assert_eq!(parse_date("TBD", 2025), None);
        assert_eq!(parse_date("2025-03-03", 2025), None);
        assert_eq!(parse_date("March", 2025), None);
    }

    #[test]
    fn parses_utc_and_gmt_times() {
        assert_eq!(parse_time("18:30 UTC"), NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(parse_time("04:11 GMT"), NaiveTime::from_hms_opt(4, 11, 0));
    }

    #[test]
    fn rejects_other_time_formats() {
        assert_eq!(parse_time("18:30"), None);
        assert_eq!(parse_time("18:30 EDT"), None);
        assert_eq!(parse_time("6:30 p.m. UTC"), None);
        assert_eq!(parse_time("25:00 UTC"), None);
    }
}
