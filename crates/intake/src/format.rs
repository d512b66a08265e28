//! Currency, date and age formatting for court forms

use chrono::{Datelike, NaiveDate};

/// Date layouts accepted from form builders, tried in order
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Parse an amount typed by a person
///
/// Every character other than digits, `.` and `-` is stripped, then the
/// longest leading number is read. Anything unreadable is `0`.
///
/// ```
/// use intake::format::parse_amount;
///
/// assert_eq!(parse_amount("$1,234.56"), 1234.56);
/// assert_eq!(parse_amount("about 12.5.3"), 12.5);
/// assert_eq!(parse_amount("n/a"), 0.0);
/// ```
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned).unwrap_or(0.0)
}

/// Read the longest prefix of the form `-?digits.digits`
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Format an amount with two decimals and no grouping
pub fn format_amount(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return "0.00".to_string();
    }
    format!("{amount:.2}")
}

/// Normalize an optional typed amount; absent is `"0.00"`
///
/// ```
/// use intake::format::currency;
///
/// assert_eq!(currency(Some("$1,234.56")), "1234.56");
/// assert_eq!(currency(None), "0.00");
/// ```
pub fn currency(raw: Option<&str>) -> String {
    format_amount(raw.map(parse_amount).unwrap_or(0.0))
}

/// Parse a date written in any of the accepted layouts
///
/// ISO timestamps are read by their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let iso_prefix = raw
        .get(..10)
        .filter(|_| matches!(raw.as_bytes().get(10), Some(b'T') | Some(b' ')));
    if let Some(prefix) = iso_prefix {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// `MM/DD/YYYY`
pub fn format_us_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Format an optional date as `MM/DD/YYYY`
///
/// Absent and unreadable input both yield an empty string.
///
/// ```
/// use intake::format::format_date;
///
/// assert_eq!(format_date(Some("2010-05-01")), "05/01/2010");
/// assert_eq!(format_date(Some("3/7/2012")), "03/07/2012");
/// assert_eq!(format_date(None), "");
/// ```
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date).map(format_us_date).unwrap_or_default()
}

/// Format a date when readable, otherwise keep the text as typed
pub fn format_date_or_raw(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format_us_date(date),
        None => raw.trim().to_string(),
    }
}

/// Age in whole years on `today`; `None` for birth dates in the future
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Age as text for a typed birth date; empty when unknown
pub fn age_text(raw: Option<&str>, today: NaiveDate) -> String {
    raw.and_then(parse_date)
        .and_then(|birth| calculate_age(birth, today))
        .map(|age| age.to_string())
        .unwrap_or_default()
}

/// First candidate that is present and not blank
///
/// ```
/// use intake::format::first_non_empty;
///
/// assert_eq!(first_non_empty([Some(""), None, Some("Ann")]), Some("Ann"));
/// assert_eq!(first_non_empty([None, Some("  ")]), None);
/// ```
pub fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_currency_strips_extraneous_characters() {
        assert_eq!(currency(Some("$1,234.56")), "1234.56");
        assert_eq!(currency(Some("USD 75")), "75.00");
        assert_eq!(currency(Some("  -20.5 ")), "-20.50");
        assert_eq!(currency(Some("1,000,000")), "1000000.00");
    }

    #[test]
    fn test_currency_defaults_to_zero() {
        assert_eq!(currency(None), "0.00");
        assert_eq!(currency(Some("")), "0.00");
        assert_eq!(currency(Some("unknown")), "0.00");
        assert_eq!(currency(Some("-")), "0.00");
        assert_eq!(currency(Some("-0")), "0.00");
    }

    #[test]
    fn test_parse_amount_reads_leading_number() {
        assert_eq!(parse_amount("12.34.56"), 12.34);
        assert_eq!(parse_amount("1-2"), 1.0);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("5."), 5.0);
    }

    #[test]
    fn test_format_amount_rounds() {
        assert_eq!(format_amount(1.005), "1.00");
        assert_eq!(format_amount(2.675), "2.67");
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(f64::NAN), "0.00");
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = date(2010, 5, 1);
        for raw in [
            "2010-05-01",
            "2010-05-01T12:00:00.000Z",
            "05/01/2010",
            "5/1/2010",
            "05-01-2010",
            "2010/05/01",
            "May 1, 2010",
            "May 01, 2010",
            "1 May 2010",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_format_date_is_zero_padded() {
        assert_eq!(format_date(Some("2012-03-15")), "03/15/2012");
        assert_eq!(format_date(Some("1/2/2003")), "01/02/2003");
    }

    #[test]
    fn test_format_date_empty_for_missing_or_invalid() {
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some("")), "");
        assert_eq!(format_date(Some("next tuesday")), "");
        assert_eq!(format_date(Some("2010-13-40")), "");
    }

    #[test]
    fn test_format_date_or_raw() {
        assert_eq!(format_date_or_raw("2010-05-01"), "05/01/2010");
        assert_eq!(format_date_or_raw(" spring 2010 "), "spring 2010");
    }

    #[test]
    fn test_calculate_age() {
        let today = date(2025, 6, 15);
        assert_eq!(calculate_age(date(1950, 6, 15), today), Some(75));
        assert_eq!(calculate_age(date(1950, 6, 16), today), Some(74));
        assert_eq!(calculate_age(date(1950, 1, 1), today), Some(75));
        assert_eq!(calculate_age(date(2026, 1, 1), today), None);
    }

    #[test]
    fn test_age_text() {
        let today = date(2025, 6, 15);
        assert_eq!(age_text(Some("1940-12-31"), today), "84");
        assert_eq!(age_text(Some("garbage"), today), "");
        assert_eq!(age_text(None, today), "");
    }

    #[test]
    fn test_first_non_empty_prefers_specific_role() {
        assert_eq!(first_non_empty([Some("Guardian"), Some("Petitioner")]), Some("Guardian"));
        assert_eq!(first_non_empty([Some(""), Some("Petitioner")]), Some("Petitioner"));
        assert_eq!(first_non_empty([None, None]), None);
    }
}
