//! Calendar helpers shared by the CLI, the timeline and the dashboard.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date. Anything else is rejected instead of being
/// coerced into some default.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    let (year, month) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| Error::InvalidMonth(input.to_string()))?;
    let year: i32 = year
        .parse()
        .map_err(|_| Error::InvalidMonth(input.to_string()))?;
    let month: u32 = month
        .parse()
        .map_err(|_| Error::InvalidMonth(input.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::InvalidMonth(input.to_string()))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}-{}", start.format("%d/%m"), end.format("%d/%m/%Y"))
}

/// Human phrase for how far `date` is from `today`.
pub fn relative_time(date: NaiveDate, today: NaiveDate) -> String {
    let days = date.signed_duration_since(today).num_days();
    match days {
        0 => "hoy".to_string(),
        1 => "mañana".to_string(),
        -1 => "ayer".to_string(),
        d if d > 0 => format!("en {}", distance(d)),
        d => format!("hace {}", distance(-d)),
    }
}

fn distance(days: i64) -> String {
    let (amount, one, many) = if days < 30 {
        (days, "día", "días")
    } else if days < 365 {
        (days / 30, "mes", "meses")
    } else {
        (days / 365, "año", "años")
    };
    if amount == 1 {
        format!("1 {one}")
    } else {
        format!("{amount} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date(" 2024-01-01 ").unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn unparsable_dates_fail_fast() {
        for input in ["", "ayer", "2024-13-01", "01/02/2024", "2024-02-30"] {
            let err = parse_date(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDate { .. }),
                "{input} -> {err:?}"
            );
        }
    }

    #[test]
    fn parses_months() {
        assert_eq!(parse_month("2024-03").unwrap(), date(2024, 3, 1));
        assert!(matches!(parse_month("2024-13"), Err(Error::InvalidMonth(_))));
        assert!(matches!(parse_month("marzo"), Err(Error::InvalidMonth(_))));
    }

    #[test]
    fn formats_dates_and_ranges() {
        assert_eq!(format_date(date(2024, 3, 1)), "01/03/2024");
        assert_eq!(
            format_date_range(date(2024, 1, 8), date(2024, 3, 1)),
            "08/01-01/03/2024"
        );
    }

    #[test]
    fn relative_phrases() {
        let today = date(2024, 5, 10);

        assert_eq!(relative_time(today, today), "hoy");
        assert_eq!(relative_time(date(2024, 5, 11), today), "mañana");
        assert_eq!(relative_time(date(2024, 5, 9), today), "ayer");
        assert_eq!(relative_time(date(2024, 5, 15), today), "en 5 días");
        assert_eq!(relative_time(date(2024, 4, 10), today), "hace 1 mes");
        assert_eq!(relative_time(date(2026, 5, 10), today), "en 2 años");
    }
}
