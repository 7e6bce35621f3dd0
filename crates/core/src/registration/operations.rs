//! Pure validation rules for registration forms.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::error::{Field, ValidationError};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const MIN_CAPACITY: u32 = 1;
pub const MAX_CAPACITY: u32 = 10_000;

/// Trims `value` and checks it is present and at most `max` characters long.
pub fn validate_text(field: Field, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Parses an event date.
///
/// Accepts `datetime-local` values (`YYYY-MM-DDTHH:MM` with optional seconds),
/// RFC 3339 timestamps (converted to their UTC wall time) and bare dates
/// (midnight).
pub fn parse_event_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Validates the raw date field.
pub fn validate_date(value: &str) -> Result<NaiveDateTime, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(Field::Date));
    }
    parse_event_date(value).ok_or(ValidationError::InvalidDate)
}

/// Validates the raw capacity field.
pub fn validate_capacity(value: Option<f64>) -> Result<u32, ValidationError> {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return Err(ValidationError::CapacityNotANumber),
    };
    if value.fract() != 0.0 {
        return Err(ValidationError::CapacityNotWhole);
    }
    if value < f64::from(MIN_CAPACITY) {
        return Err(ValidationError::CapacityTooSmall { min: MIN_CAPACITY });
    }
    if value > f64::from(MAX_CAPACITY) {
        return Err(ValidationError::CapacityTooLarge);
    }
    Ok(value as u32)
}

/// Validates the raw email field.
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(Field::Email));
    }
    if !is_valid_email(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    if trimmed.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: Field::Email,
            max: EMAIL_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Checks the `local@domain.tld` shape: exactly one `@`, no whitespace, a
/// dotted domain with no empty labels.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty() && !label.starts_with('-') && !label.ends_with('-')
        })
        && labels.last().is_some_and(|tld| tld.len() >= 2)
}
