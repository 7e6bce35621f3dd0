//! Form payloads collected by the view layer.
//!
//! Forms hold raw user input. Calling `validate` either produces the typed
//! input a store accepts or every field error found, so structurally invalid
//! data never reaches a store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{Field, ValidationErrors};
use super::operations::{
    validate_capacity, validate_date, validate_email, validate_text, DESCRIPTION_MAX_CHARS,
    NAME_MAX_CHARS, TITLE_MAX_CHARS,
};
use super::types::{EventPatch, NewAttendee, NewEvent};
use crate::serde::{deserialize_optional_number, deserialize_optional_string};

/// Raw input from the create-event form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub capacity: Option<f64>,
}

impl EventForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        capacity: u32,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            date: date.into(),
            capacity: Some(f64::from(capacity)),
        }
    }

    /// Validates every field, collecting all failures.
    pub fn validate(&self) -> Result<NewEvent, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = validate_text(Field::Title, &self.title, TITLE_MAX_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let description = validate_text(Field::Description, &self.description, DESCRIPTION_MAX_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let date = validate_date(&self.date).map_err(|e| errors.push(e)).ok();
        let capacity = validate_capacity(self.capacity)
            .map_err(|e| errors.push(e))
            .ok();

        match (title, description, date, capacity) {
            (Some(title), Some(description), Some(date), Some(capacity)) => Ok(NewEvent {
                title,
                description,
                date,
                capacity,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw input from the edit-event form. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatchForm {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub capacity: Option<f64>,
}

impl EventPatchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<EventPatch, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut patch = EventPatch::default();

        if let Some(title) = &self.title {
            match validate_text(Field::Title, title, TITLE_MAX_CHARS) {
                Ok(title) => patch.title = Some(title),
                Err(e) => errors.push(e),
            }
        }
        if let Some(description) = &self.description {
            match validate_text(Field::Description, description, DESCRIPTION_MAX_CHARS) {
                Ok(description) => patch.description = Some(description),
                Err(e) => errors.push(e),
            }
        }
        if let Some(date) = &self.date {
            match validate_date(date) {
                Ok(date) => patch.date = Some(date),
                Err(e) => errors.push(e),
            }
        }
        if self.capacity.is_some() {
            match validate_capacity(self.capacity) {
                Ok(capacity) => patch.capacity = Some(capacity),
                Err(e) => errors.push(e),
            }
        }

        errors.into_result(|| patch)
    }
}

/// Raw input from the register-attendee form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendeeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl AttendeeForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Validates the form for registration to `event_id`.
    pub fn validate(&self, event_id: Uuid) -> Result<NewAttendee, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = validate_text(Field::Name, &self.name, NAME_MAX_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let email = validate_email(&self.email).map_err(|e| errors.push(e)).ok();

        match (name, email) {
            (Some(name), Some(email)) => Ok(NewAttendee {
                event_id,
                name,
                email,
            }),
            _ => Err(errors),
        }
    }
}
