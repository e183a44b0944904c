//! Employee records, payload validation, and the concurrency-guarded store that owns them.

mod store;
pub mod types;
pub mod validation;

pub use store::{EmployeeApi, EmployeeStore};
pub use types::{AddOutcome, Employee, NewEmployee};
pub use validation::{EmployeePayload, ValidationError};
