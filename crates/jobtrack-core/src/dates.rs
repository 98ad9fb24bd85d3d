use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

use crate::models::Cell;

// ── ApplicationDateParser ─────────────────────────────────────────────────────

/// Naive date-time patterns for strings that open with a four-digit year;
/// only the date part is kept.
const YEAR_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only patterns for strings that open with a four-digit year.
const YEAR_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Month-first naive date-time patterns.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only patterns for everything else. Month-first beats day-first for
/// slash dates. `%Y` accepts one to four digits, so each two-digit year form
/// must precede its four-digit one.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
];

/// Width of a full year group.
const YEAR_DIGITS: usize = 4;

/// Day zero of the spreadsheet serial-date calendar.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial that still lands on a four-digit year (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Turns an `ApplicationDate` cell into a calendar date.
pub struct ApplicationDateParser;

impl ApplicationDateParser {
    /// Parse a raw cell.
    ///
    /// * text   → trimmed, then tried as RFC 3339, naive date-times and the
    ///   common date layouts in [`DATE_FORMATS`].
    /// * number → spreadsheet serial date (days since 1899-12-30).
    /// * blank  → `None`.
    pub fn parse(cell: &Cell) -> Option<NaiveDate> {
        match cell {
            Cell::Blank => None,
            Cell::Text(s) => Self::parse_str(s),
            Cell::Number(n) => Self::from_serial(*n),
        }
    }

    /// Parse a date string; `None` when no known layout matches.
    pub fn parse_str(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        // Offset-bearing timestamps keep the calendar date as written.
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        // Year-first layouts only apply to an explicit four-digit year, so
        // `3/1/24` never reads as year 3.
        let (datetime_formats, date_formats) = if leading_digits(s) == YEAR_DIGITS {
            (YEAR_FIRST_DATETIME_FORMATS, YEAR_FIRST_DATE_FORMATS)
        } else {
            (DATETIME_FORMATS, DATE_FORMATS)
        };

        for fmt in datetime_formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    }

    /// Convert a spreadsheet serial number; the fractional (time) part is
    /// dropped.
    pub fn from_serial(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
            return None;
        }
        let (y, m, d) = SERIAL_EPOCH;
        NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.trunc() as u64))
    }
}

/// Number of ASCII digits at the start of `s`.
fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
