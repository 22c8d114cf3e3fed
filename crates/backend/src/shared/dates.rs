//! Best-effort normalization of the date cells that arrive in import
//! spreadsheets: ISO strings, Excel serial numbers and the Brazilian
//! day-first forms, in that order.
//!
//! Two-part-ambiguous numeric dates are always read day-before-month. That
//! is the source system's locale, not a bug; do not flip it to month-first.

use chrono::{DateTime, NaiveDate, Utc};

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
const EXCEL_UNIX_EPOCH_OFFSET_DAYS: f64 = 25569.0;

/// Serial numbers outside this window are almost certainly not dates
/// (1900-01-01 .. ~2173) and fall through to the string parsers.
const SERIAL_MIN: f64 = 1.0;
const SERIAL_MAX: f64 = 100_000.0;

/// A normalized calendar date plus the flag that makes the legacy
/// fallback-to-today behavior observable to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate {
    pub date: NaiveDate,
    /// True when nothing in the cell was recognized and today was assumed
    pub assumed_today: bool,
}

/// Normalize a raw date cell. Never fails: unrecognized input yields the
/// current date with `assumed_today` set, which callers are expected to log.
pub fn normalize(raw: &str) -> NormalizedDate {
    let trimmed = raw.trim();

    if let Some(date) = parse_recognized(trimmed) {
        return NormalizedDate {
            date,
            assumed_today: false,
        };
    }

    NormalizedDate {
        date: Utc::now().date_naive(),
        assumed_today: true,
    }
}

fn parse_recognized(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }

    // 1. Already canonical
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    // 2. Spreadsheet serial number
    if let Some(date) = parse_excel_serial(value) {
        return Some(date);
    }

    // 3./4. Three-part numeric dates with / or - separators, day-first when
    // the year comes last
    if let Some(date) = parse_separated(value) {
        return Some(date);
    }

    // 5. Lenient last resort; %y pivots two-digit years to 2000-2068
    for format in ["%d.%m.%Y", "%Y-%m-%d %H:%M:%S", "%d/%m/%y", "%d-%m-%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    None
}

fn parse_excel_serial(value: &str) -> Option<NaiveDate> {
    let serial: f64 = value.parse().ok()?;
    if !serial.is_finite() || !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    let unix_seconds = ((serial - EXCEL_UNIX_EPOCH_OFFSET_DAYS) * 86_400.0) as i64;
    DateTime::from_timestamp(unix_seconds, 0).map(|dt| dt.date_naive())
}

fn parse_separated(value: &str) -> Option<NaiveDate> {
    // Spreadsheets mix / and - freely; fold to one separator before splitting
    let normalized = value.replace('-', "/");
    let parts: Vec<&str> = normalized.split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }

    let numbers: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (year, month, day) = if parts[0].len() == 4 {
        // YYYY/MM/DD
        (numbers[0] as i32, numbers[1], numbers[2])
    } else if parts[2].len() == 4 {
        // DD/MM/YYYY or DD-MM-YYYY, day before month
        (numbers[2] as i32, numbers[1], numbers[0])
    } else {
        // Two-digit years are not a first-century date; let the lenient
        // formats pivot them instead
        return None;
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_passes_through() {
        let normalized = normalize("2024-06-16");
        assert_eq!(normalized.date, date(2024, 6, 16));
        assert!(!normalized.assumed_today);
    }

    #[test]
    fn test_day_before_month_is_preserved() {
        assert_eq!(normalize("16/06/2024").date, date(2024, 6, 16));
        assert_eq!(normalize("16-06-2024").date, date(2024, 6, 16));
        // 03/04 is April 3rd, not March 4th
        assert_eq!(normalize("03/04/2024").date, date(2024, 4, 3));
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(normalize("45458").date, date(2024, 6, 15));
        // Serial 25569 is the Unix epoch itself
        assert_eq!(normalize("25569").date, date(1970, 1, 1));
    }

    #[test]
    fn test_year_first_with_slashes() {
        assert_eq!(normalize("2024/06/16").date, date(2024, 6, 16));
    }

    #[test]
    fn test_two_digit_year_pivots_to_current_century() {
        let normalized = normalize("16/06/24");
        assert_eq!(normalized.date, date(2024, 6, 16));
        assert!(!normalized.assumed_today);
        assert_eq!(normalize("16-06-24").date, date(2024, 6, 16));
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(normalize("2024-06/16").date, date(2024, 6, 16));
        assert_eq!(normalize("16-06/2024").date, date(2024, 6, 16));
    }

    #[test]
    fn test_zero_padding_not_required() {
        assert_eq!(normalize("1/6/2024").date, date(2024, 6, 1));
    }

    #[test]
    fn test_unrecognized_falls_back_to_today_with_flag() {
        let normalized = normalize("primeiro de junho");
        assert!(normalized.assumed_today);
        assert_eq!(normalized.date, Utc::now().date_naive());

        assert!(normalize("").assumed_today);
        assert!(normalize("31/02/2024").assumed_today);
    }
}
