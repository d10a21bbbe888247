//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::blank_to_none;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Renders as "surname, first_name"; absent parts are empty.
impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}",
            self.surname.as_deref().unwrap_or(""),
            self.first_name.as_deref().unwrap_or("")
        )
    }
}

/// Create or update author request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Surname must be at most 100 characters"))]
    pub surname: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorInput {
    /// Blank names are stored as NULL
    pub fn normalized(self) -> Self {
        Self {
            first_name: blank_to_none(self.first_name),
            surname: blank_to_none(self.surname),
            ..self
        }
    }
}
