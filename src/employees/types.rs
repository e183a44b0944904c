//! Record types shared by the store and the HTTP surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored employee record.
///
/// Records are immutable once created; the only lifecycle transitions are insertion through
/// [`crate::employees::EmployeeStore::add`] and deletion through
/// [`crate::employees::EmployeeStore::remove`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// System-assigned identifier (UUID v4).
    pub id: String,
    /// Trimmed first name.
    pub first_name: String,
    /// Trimmed last name.
    pub last_name: String,
    /// Trimmed email address; unique across the store.
    pub email: String,
}

/// A validated employee that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Trimmed first name (at least three characters).
    pub first_name: String,
    /// Trimmed last name (at least three characters).
    pub last_name: String,
    /// Trimmed, syntactically valid email address.
    pub email: String,
}

impl NewEmployee {
    /// Attach an identifier, producing a complete record ready for insertion.
    pub fn with_id(self, id: impl Into<String>) -> Employee {
        Employee {
            id: id.into(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }

    /// Attach a freshly generated UUID v4 identifier.
    pub fn into_employee(self) -> Employee {
        self.with_id(uuid::Uuid::new_v4().to_string())
    }
}

/// Result of [`crate::employees::EmployeeStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The record was inserted and is returned unchanged.
    Created(Employee),
    /// A record with the same email (or id) already exists; nothing was stored.
    Conflict,
}

impl AddOutcome {
    /// Whether this outcome inserted a record.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
