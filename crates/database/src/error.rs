use models::timetable::SlotError;
use sea_orm::{DbErr, SqlErr};
use std::{collections::BTreeMap, fmt::Display};
use thiserror::Error;

/// Validation messages keyed by the offending input field
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// One or more input fields were rejected; nothing was written
    #[error("invalid input: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    /// The write would break a uniqueness rule
    #[error("{0}")]
    Conflict(String),

    /// The write is refused by a policy
    #[error("{0}")]
    Forbidden(String),

    /// Non-database failure inside the service
    #[error("failed to {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Turns a unique-index violation into a `Conflict`, leaving other errors untouched
    pub fn conflict_on_unique(err: DbErr, message: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(message.into()),
            _ => Self::Database(err),
        }
    }
}

impl From<SlotError> for ServiceError {
    fn from(err: SlotError) -> Self {
        let field = match err {
            SlotError::Day(_) => "day",
            SlotError::Time(_) => "time",
        };
        Self::Validation(FieldErrors::from([(field.to_owned(), err.to_string())]))
    }
}

/// Collects per-field errors so every problem is reported at once
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Returns the trimmed value, or records a "required" error when it is blank
    pub fn required(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, "This field is required");
        }
        value.to_owned()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validator_keeps_first_message_per_field() {
        let mut v = Validator::new();
        assert_eq!(v.required("name", "  "), "");
        v.add("name", "second");
        v.add("code", "taken");

        match v.finish() {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors["name"], "This field is required");
                assert_eq!(errors["code"], "taken");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validator_passes_when_empty() {
        let mut v = Validator::new();
        assert_eq!(v.required("name", " Algebra "), "Algebra");
        assert!(v.finish().is_ok());
    }
}
