//! Bill date parsing for history ordering.
//!
//! Bill dates are free text. New bills use `DD/MM/YYYY`; older entries were
//! written as `"28 Out, 2023"` with Portuguese month abbreviations.

use chrono::NaiveDate;

const MONTHS_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Parses `DD/MM/YYYY` or `DD Mmm, YYYY`. Anything else is `None`.
///
/// ## Example
/// ```rust
/// use billsplit_store::parse_bill_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_bill_date("28/10/2023"), NaiveDate::from_ymd_opt(2023, 10, 28));
/// assert_eq!(parse_bill_date("28 Out, 2023"), NaiveDate::from_ymd_opt(2023, 10, 28));
/// assert_eq!(parse_bill_date("ontem"), None);
/// ```
pub fn parse_bill_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%d/%m/%Y")
        .ok()
        .or_else(|| parse_month_name(input))
}

fn parse_month_name(input: &str) -> Option<NaiveDate> {
    let mut parts = input.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = parts.next()?.trim_end_matches(',').to_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let month = MONTHS_PT
        .iter()
        .position(|m| month.starts_with(m))
        .map(|idx| idx as u32 + 1)?;

    NaiveDate::from_ymd_opt(year, month, day)
}
