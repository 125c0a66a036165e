use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ledgerdesk_core::{local_midnight, DayBounds};
use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_date_shape, r"^\d{4}(?:[-/]\d{1,2}(?:[-/]\d{1,2})?)?$");
re!(re_full_date, r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$");
re!(re_year_month, r"^(\d{4})[-/](\d{1,2})$");
re!(re_year, r"^(\d{4})$");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Day,
    Month,
    Year,
}

/// What a search box entry was recognised as.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTerm {
    /// A calendar date; `date` is the first day covered at `precision`.
    Date {
        precision: DatePrecision,
        date: NaiveDate,
    },
    Number(f64),
    Text(String),
}

impl SearchTerm {
    /// The single instant a date term stands for: local midnight of its
    /// first day, in UTC.
    pub fn instant<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            SearchTerm::Date { date, .. } => local_midnight(tz, *date),
            _ => None,
        }
    }
}

/// Shape check only: `YYYY`, `YYYY-M[M]`, `YYYY-M[M]-D[D]`, with `-` or `/`.
pub fn is_date_like(term: &str) -> bool {
    re_date_shape().is_match(term.trim())
}

/// True when `term` reads as a finite number and is not date-shaped, so
/// `"2024"` is a year rather than an amount.
pub fn is_numeric(term: &str) -> bool {
    let term = term.trim();
    !is_date_like(term) && term.parse::<f64>().is_ok_and(f64::is_finite)
}

fn capture_num<T: std::str::FromStr>(caps: &regex::Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

/// Resolves a date-shaped term to a real calendar date. `2024-02-30` and
/// `2024-13` do not resolve.
pub fn parse_search_date(term: &str) -> Option<(DatePrecision, NaiveDate)> {
    let term = term.trim();

    if let Some(caps) = re_full_date().captures(term) {
        let date = NaiveDate::from_ymd_opt(
            capture_num(&caps, 1)?,
            capture_num(&caps, 2)?,
            capture_num(&caps, 3)?,
        )?;
        return Some((DatePrecision::Day, date));
    }
    if let Some(caps) = re_year_month().captures(term) {
        let date = NaiveDate::from_ymd_opt(capture_num(&caps, 1)?, capture_num(&caps, 2)?, 1)?;
        return Some((DatePrecision::Month, date));
    }
    if let Some(caps) = re_year().captures(term) {
        let date = NaiveDate::from_ymd_opt(capture_num(&caps, 1)?, 1, 1)?;
        return Some((DatePrecision::Year, date));
    }
    None
}

/// Classifies a search box entry. Returns `None` for blank input.
pub fn classify(term: &str) -> Option<SearchTerm> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let classified = if let Some((precision, date)) = parse_search_date(term) {
        SearchTerm::Date { precision, date }
    } else if is_numeric(term) {
        SearchTerm::Number(term.parse().unwrap_or_default())
    } else {
        SearchTerm::Text(term.to_string())
    };
    tracing::debug!(term, ?classified, "classified search term");
    Some(classified)
}

/// Single-instant form: local midnight of the day, month start, or Jan 1.
pub fn search_instant<Tz: TimeZone>(tz: &Tz, term: &str) -> Option<DateTime<Utc>> {
    classify(term)?.instant(tz)
}

/// Day-range form used when compiling API filters. Only a full
/// `YYYY-MM-DD` term produces bounds.
pub fn search_day_bounds<Tz: TimeZone>(tz: &Tz, term: &str) -> Option<DayBounds> {
    match parse_search_date(term)? {
        (DatePrecision::Day, date) => DayBounds::for_day(tz, date),
        _ => None,
    }
}
