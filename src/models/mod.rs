pub mod diagnosis;
pub mod enums;
pub mod patient;
pub mod referral;

pub use diagnosis::*;
pub use enums::*;
pub use patient::*;
pub use referral::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnum { field: String, value: String },
}

/// Borrow an optional form field only when it holds a non-empty value.
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
