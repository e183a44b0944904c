//! Request payload schema and the rules applied before anything reaches the store.

use crate::employees::types::NewEmployee;
use regex::Regex;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum trimmed length for names and path identifiers.
pub const MIN_NAME_LENGTH: usize = 3;

/// Wire names accepted in a create body, in the order they are checked.
const PAYLOAD_FIELDS: [&str; 3] = ["firstName", "lastName", "email"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("valid email regex")
});

/// Validation failures reported back to API callers. Only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("{field} is required")]
    Missing {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// A field was present but not a JSON string.
    #[error("{field} must be a string")]
    NotAString {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// A string field was shorter than its minimum length after trimming.
    #[error("{field} must be at least {min} characters long")]
    TooShort {
        /// Wire name of the offending field.
        field: &'static str,
        /// Minimum accepted length.
        min: usize,
    },
    /// The email field did not look like an email address.
    #[error("Invalid email")]
    InvalidEmail,
    /// The body carried keys outside the payload schema.
    #[error("Unrecognized key(s) in object: {}", quote_keys(.0))]
    UnknownFields(Vec<String>),
}

/// Body accepted by `POST /api/employees`, as published in the OpenAPI document.
///
/// [`EmployeePayload::parse`] enforces the same shape on raw JSON: every field is checked in
/// declaration order, and unknown keys are reported only once the known fields pass.
#[derive(Debug, Clone, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeePayload {
    /// First name; surrounding whitespace is trimmed.
    #[schemars(length(min = 3))]
    pub first_name: String,
    /// Last name; surrounding whitespace is trimmed.
    #[schemars(length(min = 3))]
    pub last_name: String,
    /// Email address; surrounding whitespace is trimmed.
    #[schemars(email)]
    pub email: String,
}

impl EmployeePayload {
    /// Validate a raw JSON object and produce a trimmed [`NewEmployee`].
    pub fn parse(body: &Map<String, Value>) -> Result<NewEmployee, ValidationError> {
        let first_name = require_min_length("firstName", string_field(body, "firstName")?)?;
        let last_name = require_min_length("lastName", string_field(body, "lastName")?)?;
        let email = string_field(body, "email")?.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        let mut unknown: Vec<String> = body
            .keys()
            .filter(|key| !PAYLOAD_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ValidationError::UnknownFields(unknown));
        }

        Ok(NewEmployee {
            first_name,
            last_name,
            email: email.to_string(),
        })
    }
}

/// Check the `{id}` path segment of `DELETE /api/employees/{id}`.
pub fn validate_employee_id(id: &str) -> Result<(), ValidationError> {
    if id.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "id",
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Syntactic email check: a dotted domain with an alphabetic TLD, and a local part that
/// neither starts with a dot nor contains consecutive dots.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.starts_with('.') || candidate.contains("..") {
        return false;
    }
    EMAIL_RE.is_match(candidate)
}

fn string_field<'a>(
    body: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match body.get(field) {
        None => Err(ValidationError::Missing { field }),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ValidationError::NotAString { field }),
    }
}

fn require_min_length(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field,
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

fn quote_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
