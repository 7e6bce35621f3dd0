use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Form fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    Date,
    Capacity,
    Name,
    Email,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Date => "Date",
            Field::Capacity => "Capacity",
            Field::Name => "Name",
            Field::Email => "Email",
        };
        f.write_str(label)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must be less than {max} characters")]
    TooLong { field: Field, max: usize },
    #[error("Invalid date format")]
    InvalidDate,
    #[error("Capacity must be a number")]
    CapacityNotANumber,
    #[error("Capacity must be a whole number")]
    CapacityNotWhole,
    #[error("Capacity must be at least {min}")]
    CapacityTooSmall { min: u32 },
    #[error("Capacity cannot exceed 10,000")]
    CapacityTooLarge,
    #[error("Invalid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field) | ValidationError::TooLong { field, .. } => *field,
            ValidationError::InvalidDate => Field::Date,
            ValidationError::CapacityNotANumber
            | ValidationError::CapacityNotWhole
            | ValidationError::CapacityTooSmall { .. }
            | ValidationError::CapacityTooLarge => Field::Capacity,
            ValidationError::InvalidEmail => Field::Email,
        }
    }
}

/// Every validation failure found in a form, in field order.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Returns the error reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|error| error.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Converts to `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
