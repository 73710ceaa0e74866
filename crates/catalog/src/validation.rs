//! Form validation for author submissions.
//!
//! Each field has a fixed, ordered list of rules. Every field is checked and
//! all failures are collected in field order; within one field the first
//! failing rule ends that field's checks, so a blank name reports "required"
//! and nothing else.
//!
//! Values are trimmed before checking. HTML escaping is left to the template
//! layer, which escapes every interpolated value on output.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::models::AuthorInput;

/// Raw author form as submitted by the browser.
///
/// Any `id` the client sends is ignored; identity always comes from the route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

impl AuthorForm {
    /// Copy of the form with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_owned(),
            family_name: self.family_name.trim().to_owned(),
            date_of_birth: self.date_of_birth.trim().to_owned(),
            date_of_death: self.date_of_death.trim().to_owned(),
        }
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// User-facing message.
    pub message: &'static str,
}

/// Ordered collection of validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failures in the order they were found.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any rule failed for `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// A predicate over a trimmed field value and the message shown when it fails.
struct Rule {
    check: fn(&str) -> bool,
    message: &'static str,
}

/// Rules for one field.
struct FieldRules {
    field: &'static str,
    value: fn(&AuthorForm) -> &str,
    /// Blank values skip the rules entirely.
    optional: bool,
    rules: &'static [Rule],
}

const FIRST_NAME_RULES: &[Rule] = &[
    Rule {
        check: is_present,
        message: "名を指定してください。",
    },
    Rule {
        check: is_ascii_alphanumeric,
        message: "名は半角アルファベットで指定してください。",
    },
];

const FAMILY_NAME_RULES: &[Rule] = &[
    Rule {
        check: is_present,
        message: "氏を指定してください。",
    },
    Rule {
        check: is_ascii_alphanumeric,
        message: "氏は半角アルファベットで指定してください。",
    },
];

const DATE_OF_BIRTH_RULES: &[Rule] = &[Rule {
    check: is_iso8601_date,
    message: "無効な生年月日です。",
}];

const DATE_OF_DEATH_RULES: &[Rule] = &[Rule {
    check: is_iso8601_date,
    message: "無効な没年月日です。",
}];

const AUTHOR_FIELDS: &[FieldRules] = &[
    FieldRules {
        field: "first_name",
        value: first_name,
        optional: false,
        rules: FIRST_NAME_RULES,
    },
    FieldRules {
        field: "family_name",
        value: family_name,
        optional: false,
        rules: FAMILY_NAME_RULES,
    },
    FieldRules {
        field: "date_of_birth",
        value: date_of_birth,
        optional: true,
        rules: DATE_OF_BIRTH_RULES,
    },
    FieldRules {
        field: "date_of_death",
        value: date_of_death,
        optional: true,
        rules: DATE_OF_DEATH_RULES,
    },
];

fn first_name(form: &AuthorForm) -> &str {
    &form.first_name
}

fn family_name(form: &AuthorForm) -> &str {
    &form.family_name
}

fn date_of_birth(form: &AuthorForm) -> &str {
    &form.date_of_birth
}

fn date_of_death(form: &AuthorForm) -> &str {
    &form.date_of_death
}

fn is_present(value: &str) -> bool {
    !value.is_empty()
}

fn is_ascii_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_iso8601_date(value: &str) -> bool {
    parse_iso8601_date(value).is_some()
}

/// Parse an ISO-8601 calendar date, or a date-time whose date part is kept.
///
/// The date may be reduced (`2024`, `2024-03`) or basic (`20240301`); missing
/// month and day default to the first. An optional time follows a `T` or a
/// space: `10:30`, `10:30:00.250`, with `Z` or a `+09:00` style offset.
#[must_use]
pub fn parse_iso8601_date(value: &str) -> Option<NaiveDate> {
    let (date, time) = match value.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };
    let date = parse_calendar_date(date)?;

    match time {
        None => Some(date),
        Some(time) if is_iso8601_time(date, time) => Some(date),
        Some(_) => None,
    }
}

/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `YYYYMMDD`.
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let (year, month, day) = match raw.len() {
        4 => (raw, None, None),
        7 => {
            let (year, month) = raw.split_once('-')?;
            (year, Some(month), None)
        }
        8 if raw.bytes().all(|b| b.is_ascii_digit()) => {
            (raw.get(..4)?, Some(raw.get(4..6)?), Some(raw.get(6..)?))
        }
        10 => {
            let mut parts = raw.splitn(3, '-');
            (parts.next()?, Some(parts.next()?), Some(parts.next()?))
        }
        _ => return None,
    };

    let year = i32::try_from(fixed_digits(year, 4)?).ok()?;
    let month = month.map_or(Some(1), |m| fixed_digits(m, 2))?;
    let day = day.map_or(Some(1), |d| fixed_digits(d, 2))?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse exactly `len` ASCII digits.
fn fixed_digits(raw: &str, len: usize) -> Option<u32> {
    if raw.len() != len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Whether `time` is a valid ISO-8601 time of day on `date`.
fn is_iso8601_time(date: NaiveDate, time: &str) -> bool {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

    let stamp = format!("{}T{time}", date.format("%Y-%m-%d"));
    let naive = stamp.strip_suffix('Z').unwrap_or(&stamp);

    DateTime::parse_from_rfc3339(&stamp).is_ok()
        || NAIVE_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(naive, fmt).is_ok())
        || OFFSET_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(&stamp, fmt).is_ok())
}

/// Run every author rule against a trimmed form.
fn check_author(form: &AuthorForm) -> ValidationErrors {
    let mut errors = Vec::new();
    for entry in AUTHOR_FIELDS {
        let value = (entry.value)(form);
        if entry.optional && value.is_empty() {
            continue;
        }
        if let Some(rule) = entry.rules.iter().find(|rule| !(rule.check)(value)) {
            errors.push(FieldError {
                field: entry.field,
                message: rule.message,
            });
        }
    }
    ValidationErrors(errors)
}

/// Validate a submitted author form.
///
/// # Errors
///
/// Returns every failed rule, in field order, if any field is invalid.
pub fn validate_author(form: &AuthorForm) -> Result<AuthorInput, ValidationErrors> {
    let form = form.trimmed();
    let errors = check_author(&form);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(AuthorInput {
        date_of_birth: parse_iso8601_date(&form.date_of_birth),
        date_of_death: parse_iso8601_date(&form.date_of_death),
        first_name: form.first_name,
        family_name: form.family_name,
    })
}
