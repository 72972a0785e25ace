//! Scalar value validators: dates, currencies, numeric bounds, identifiers.

use crate::config::SiteConfig;
use crate::errors::{codes, InvalidRequestParameterError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.@\-]+$").expect("identifier pattern is valid"));

/// Formats accepted by [`validate_date`], tried in order after RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a calendar date or date-time.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` (midnight).
pub fn validate_date(value: &str, field: &str) -> Result<NaiveDateTime, InvalidRequestParameterError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }

    Err(InvalidRequestParameterError::new(
        codes::DATE,
        format!("'{value}' is not a valid date for the parameter {field}"),
    )
    .with_field(field)
    .with_value(value))
}

/// Validates a three-letter currency code against the site's supported set.
///
/// Returns the lower-case code as the remote API expects it.
pub fn validate_currency_code(
    value: &str,
    field: &str,
    site: &SiteConfig,
) -> Result<String, InvalidRequestParameterError> {
    let well_formed = value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic());
    if well_formed && site.supports_currency(value) {
        return Ok(value.to_ascii_lowercase());
    }

    Err(InvalidRequestParameterError::new(
        codes::CURRENCY,
        format!(
            "{value} is not a supported currency for {field}. Supported: {}",
            site.supported_currencies
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ),
    )
    .with_field(field)
    .with_value(value))
}

/// Whether the lower bound itself is an accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `value >= threshold`.
    Inclusive,
    /// `value > threshold`.
    Exclusive,
}

/// Validates that `value` is numeric and above `threshold`.
///
/// Numeric strings are accepted. Returns the numeric value.
pub fn validate_lower_bound(
    value: &serde_json::Value,
    threshold: f64,
    bound: Bound,
    field: &str,
) -> Result<f64, InvalidRequestParameterError> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };

    let Some(number) = number else {
        return Err(InvalidRequestParameterError::new(
            codes::LOWER_BOUND,
            format!("The value of {field} must be numeric, got {value}"),
        )
        .with_field(field)
        .with_value(value.clone()));
    };

    let ok = match bound {
        Bound::Inclusive => number >= threshold,
        Bound::Exclusive => number > threshold,
    };
    if ok {
        return Ok(number);
    }

    let relation = match bound {
        Bound::Inclusive => "greater than or equal to",
        Bound::Exclusive => "greater than",
    };
    Err(InvalidRequestParameterError::new(
        codes::LOWER_BOUND,
        format!("The value of {field} must be {relation} {threshold}, got {number}"),
    )
    .with_field(field)
    .with_value(value.clone()))
}

/// Validates a restricted identifier such as a login name.
///
/// Only ASCII letters, digits, `_`, `.`, `@` and `-` are allowed.
pub fn validate_identifier(value: &str, field: &str) -> Result<(), InvalidRequestParameterError> {
    if IDENTIFIER_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(InvalidRequestParameterError::new(
            codes::IDENTIFIER,
            format!("{field} contains characters that are not allowed"),
        )
        .with_field(field)
        .with_value(value))
    }
}

/// Validates that `value` is one of `options`.
pub fn validate_option<'a>(
    value: &str,
    field: &str,
    options: &[&'a str],
) -> Result<&'a str, InvalidRequestParameterError> {
    options.iter().copied().find(|o| *o == value).ok_or_else(|| {
        InvalidRequestParameterError::new(
            codes::OPTION,
            format!("{value} is not a valid {field}; expected one of: {}", options.join(", ")),
        )
        .with_field(field)
        .with_value(value)
    })
}
