use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/* The clock stores years as an offset inside two centuries */
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2099;

const DATE_FORMAT: &str = "%d-%m-%Y";
const DATE_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A validated calendar date and time of day, as the date-diff target of the clock.
///
/// Only obtainable through [`CalendarDateTime::parse`] (or `str::parse`), so every
/// value is a real calendar date with a year the device can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDateTime {
    day: u8,
    month: u8,
    year: u16,
    hour: u8,
    minute: u8,
    second: u8,
}

impl CalendarDateTime {
    /// Parse `DD-MM-YYYY` (taken as midnight) or `DD-MM-YYYY HH:MM:SS`.
    pub fn parse(literal: &str) -> Result<CalendarDateTime> {
        if !has_literal_shape(literal) {
            return Err(Error::InvalidArgument(format!(
                "'{}' is neither DD-MM-YYYY nor DD-MM-YYYY HH:MM:SS",
                literal
            )));
        }

        let parsed = match NaiveDateTime::parse_from_str(literal, DATE_TIME_FORMAT) {
            Ok(date_time) => date_time,
            Err(full_err) => match NaiveDate::parse_from_str(literal, DATE_FORMAT) {
                Ok(date) => date.and_time(chrono::NaiveTime::MIN),
                Err(_) => {
                    return Err(Error::InvalidArgument(format!(
                        "'{}' is neither DD-MM-YYYY nor DD-MM-YYYY HH:MM:SS ({})",
                        literal, full_err
                    )))
                }
            },
        };

        /* chrono folds a :60 second into the nanosecond field */
        if parsed.nanosecond() >= 1_000_000_000 {
            return Err(Error::InvalidArgument(format!(
                "'{}' has a leap second, seconds must be between 0 and 59",
                literal
            )));
        }

        if parsed.year() < MIN_YEAR || parsed.year() > MAX_YEAR {
            return Err(Error::InvalidArgument(format!(
                "year must be between {} and {}, got {}",
                MIN_YEAR,
                MAX_YEAR,
                parsed.year()
            )));
        }

        Ok(CalendarDateTime {
            day: parsed.day() as u8,
            month: parsed.month() as u8,
            year: parsed.year() as u16,
            hour: parsed.hour() as u8,
            minute: parsed.minute() as u8,
            second: parsed.second() as u8,
        })
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

/* chrono lets a space match any run of spaces and takes a signed, unbounded %Y */
fn has_literal_shape(literal: &str) -> bool {
    let mut parts = literal.split(' ');
    let date = parts.next().unwrap_or_default();
    let time = parts.next();
    if parts.next().is_some() || time == Some("") {
        return false;
    }

    let year = date.rsplit('-').next().unwrap_or_default();
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for CalendarDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CalendarDateTime::parse(s)
    }
}

/* Same layout the device expects after `dds` */
impl Display for CalendarDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:04} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(literal: &str) -> bool {
        matches!(CalendarDateTime::parse(literal), Err(Error::InvalidArgument(_)))
    }

    #[test]
    fn date_only_is_midnight() {
        let dt: CalendarDateTime = "25-12-2024".parse().unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (25, 12, 2024));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn full_literal_keeps_time_of_day() {
        let dt = CalendarDateTime::parse("01-02-2030 13:45:07").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (13, 45, 7));
        assert_eq!(dt.to_string(), "01-02-2030 13:45:07");
    }

    #[test]
    fn century_window_bounds_are_inclusive() {
        assert!(CalendarDateTime::parse("01-01-1900").is_ok());
        assert!(CalendarDateTime::parse("31-12-2099 23:59:59").is_ok());
        assert!(invalid("31-12-1899"));
        assert!(invalid("01-01-1899"));
        assert!(invalid("01-01-2100"));
        assert!(invalid("01-01-2100 00:00:00"));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(invalid("31-04-2020"));
        assert!(invalid("30-02-2020"));
        assert!(invalid("29-02-2021"));
        assert!(invalid("00-01-2020"));
        assert!(invalid("01-13-2020"));
        assert!(CalendarDateTime::parse("29-02-2020").is_ok());
        assert!(CalendarDateTime::parse("29-02-2000").is_ok());
    }

    #[test]
    fn rejects_impossible_times() {
        assert!(invalid("01-01-2020 24:00:00"));
        assert!(invalid("01-01-2020 12:60:00"));
        assert!(invalid("01-01-2020 12:00:60"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(invalid(""));
        assert!(invalid("2024-12-25"));
        assert!(invalid("25/12/2024"));
        assert!(invalid("25-12-2024 10:00"));
        assert!(invalid("25-12-2024T10:00:00"));
        assert!(invalid("tomorrow"));
        assert!(invalid("01-01-+2024"));
        assert!(invalid("01-01-02024"));
        assert!(invalid("01-01-+02024"));
        assert!(invalid("01-01-924"));
        assert!(invalid(" 25-12-2024"));
        assert!(invalid("25-12-2024 "));
        assert!(invalid("25-12-2024  10:00:00"));
        assert!(invalid("25-12-2024\t10:00:00"));
    }

    #[test]
    fn display_zero_pads_every_field() {
        let dt = CalendarDateTime::parse("1-2-1999 3:04:05").unwrap();
        assert_eq!(dt.to_string(), "01-02-1999 03:04:05");
    }
}
