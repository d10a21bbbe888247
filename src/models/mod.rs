//! Data models for the LocalLibrary catalog

use crate::error::{AppError, AppResult, FieldErrors};

pub mod author;
pub mod book;
pub mod book_instance;
pub mod enums;
pub mod genre;
pub mod language;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails};
pub use book_instance::{BookInstance, BookInstanceDetails};
pub use enums::{LoanStatus, Permission};
pub use genre::Genre;
pub use language::Language;
pub use user::{User, UserClaims};

/// Message for a required field left blank
pub const FIELD_REQUIRED: &str = "This field is required.";

/// Reject required text fields that are empty once trimmed
pub(crate) fn require_filled(fields: &[(&str, &str)]) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    for (name, value) in fields {
        if value.trim().is_empty() {
            errors.insert(name.to_string(), vec![FIELD_REQUIRED.to_string()]);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Fields(errors))
    }
}

/// Treat blank form input as an absent value
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
