// Parsing and formatting helpers. All the messy CSV scalar handling lives
// here so the pipeline modules work with typed values only.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Forgiving `f64` parse for CSV fields: trims whitespace, strips `","`
/// thousands separators, rejects anything containing letters. `None` for
/// everything that cannot be parsed safely.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Parse a `DD/MM/YYYY` date, tolerating a trailing time component
/// separated by whitespace (`"31/12/2017 14:05"`). The time portion is
/// discarded; anything unparseable yields `None`.
pub fn parse_date_dmy(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let date_token = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_token, "%d/%m/%Y").ok()
}

/// Shift a date's year by `offset`, keeping month and day. Returns `None`
/// when the shifted date does not exist (29 Feb landing on a non-leap year).
pub fn shift_year(d: NaiveDate, offset: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(d.year() + offset, d.month(), d.day())
}

pub fn days_diff(start: NaiveDate, end: NaiveDate) -> i64 {
    // `NaiveDate` supports subtraction; the result is a `Duration` in days.
    (end - start).num_days()
}

/// Arithmetic mean; 0 for an empty slice so callers never see NaN.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Fixed-decimal rendering with `num-format` thousands separators,
/// e.g. `1,234,567.89`. Sign is re-attached after formatting the magnitude.
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative();
    let plain = format!("{:.*}", decimals, n.abs());
    let mut parts = plain.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Thousands-separated rendering for counts in console messages
/// (e.g. `9,994 rows read`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parsing_strips_trailing_time() {
        let d = parse_date_dmy(Some("31/12/2017 14:05"));
        assert_eq!(d, NaiveDate::from_ymd_opt(2017, 12, 31));
        assert_eq!(parse_date_dmy(Some("01/03/2015")), NaiveDate::from_ymd_opt(2015, 3, 1));
    }

    #[test]
    fn date_parsing_rejects_garbage() {
        assert_eq!(parse_date_dmy(Some("not-a-date")), None);
        assert_eq!(parse_date_dmy(Some("31/02/2015")), None);
        assert_eq!(parse_date_dmy(Some("")), None);
        assert_eq!(parse_date_dmy(None), None);
    }

    #[test]
    fn shift_year_handles_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2016, 2, 29).unwrap();
        assert_eq!(shift_year(leap, 2), None);
        assert_eq!(shift_year(leap, 4), NaiveDate::from_ymd_opt(2020, 2, 29));
    }

    #[test]
    fn f64_parsing_is_forgiving() {
        assert_eq!(parse_f64_safe(Some("1,234.5")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some(" 42 ")), Some(42.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
    }
}
