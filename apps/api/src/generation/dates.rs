//! `YYYY-MM` form values → Typst date expressions.

use std::fmt;

/// A Typst expression evaluating to a `datetime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateExpr {
    /// `datetime(year: Y, month: M, day: 1)`
    YearMonth { year: i32, month: u32 },
    /// `datetime.today()`, standing in for a blank date so the entry still type-checks.
    Today,
}

impl fmt::Display for DateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateExpr::YearMonth { year, month } => {
                write!(f, "datetime(year: {year}, month: {month}, day: 1)")
            }
            DateExpr::Today => f.write_str("datetime.today()"),
        }
    }
}

/// Converts a form date to a date expression.
///
/// Both parts are read as plain integers, so `"2024-03"` yields month `3`. Blank input
/// and anything without a readable year and month fall back to [`DateExpr::Today`];
/// raw text is never interpolated.
pub fn format_date(date: &str) -> DateExpr {
    let Some((year, month)) = date.trim().split_once('-') else {
        return DateExpr::Today;
    };

    match (leading_int::<i32>(year), leading_int::<u32>(month)) {
        (Some(year), Some(month)) => DateExpr::YearMonth { year, month },
        _ => DateExpr::Today,
    }
}

/// Parses the run of ASCII digits at the start of `s` (after leading whitespace).
fn leading_int<T: std::str::FromStr>(s: &str) -> Option<T> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}
