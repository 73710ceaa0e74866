//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Formats an ISO date (`1775-12-16`) as a Japanese calendar date
/// (`1775年12月16日`).
///
/// Blank input stays blank; anything unparseable is passed through untouched.
///
/// Usage in templates: `{{ author.date_of_birth|ja_date }}`
#[askama::filter_fn]
pub fn ja_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_ja_date(&value.to_string()))
}

fn format_ja_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(
        |_| raw.to_owned(),
        |date| format!("{}年{}月{}日", date.year(), date.month(), date.day()),
    )
}
