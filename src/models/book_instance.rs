//! Book instance (loanable copy) model and related types

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::LoanStatus;
use crate::error::AppResult;

/// Book instance row, joined with its book title and borrower username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Unique ID for this particular book across whole library
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    /// Publisher or registrant identifier, up to 7 characters
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
    pub status: LoanStatus,
}

impl BookInstance {
    /// Whether the copy is overdue today (local date)
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }

    /// Overdue when a due date is set and is strictly before `today`
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.due_back, Some(due_back) if due_back < today)
    }
}

impl std::fmt::Display for BookInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.book_title)
    }
}

/// Book instance as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetails {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub is_overdue: bool,
    pub display: String,
}

impl From<BookInstance> for BookInstanceDetails {
    fn from(instance: BookInstance) -> Self {
        Self {
            is_overdue: instance.is_overdue(),
            display: instance.to_string(),
            instance,
        }
    }
}

/// Create or update book instance request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInstanceInput {
    /// Required unless created inline under a book
    pub book_id: Option<i32>,
    /// This identifies a particular publisher or registrant. May be up to 7 digits.
    #[validate(length(min = 1, max = 7, message = "Imprint must be between 1 and 7 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    /// Book availability (defaults to maintenance)
    pub status: Option<LoanStatus>,
}

impl BookInstanceInput {
    pub fn status_or_default(&self) -> LoanStatus {
        self.status.unwrap_or_default()
    }

    pub fn require_filled(&self) -> AppResult<()> {
        super::require_filled(&[("imprint", &self.imprint)])
    }
}

/// Book instance list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookInstanceQuery {
    pub book_id: Option<i32>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
    /// Only copies whose due date has passed
    pub overdue: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::FIELD_REQUIRED};
    use chrono::Duration;

    fn instance(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::nil(),
            book_id: 1,
            book_title: "Hobbit".to_string(),
            imprint: "1234567".to_string(),
            due_back,
            borrower_id: None,
            borrower_username: None,
            status: LoanStatus::default(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_overdue_yesterday() {
        let copy = instance(Some(today() - Duration::days(1)));
        assert!(copy.is_overdue_on(today()));
    }

    #[test]
    fn test_not_overdue_tomorrow_or_today() {
        assert!(!instance(Some(today() + Duration::days(1))).is_overdue_on(today()));
        assert!(!instance(Some(today())).is_overdue_on(today()));
    }

    #[test]
    fn test_not_overdue_without_due_date() {
        assert!(!instance(None).is_overdue_on(today()));
        assert!(!instance(None).is_overdue());
    }

    #[test]
    fn test_overdue_against_local_clock() {
        let yesterday = Local::now().date_naive() - Duration::days(1);
        assert!(instance(Some(yesterday)).is_overdue());
    }

    #[test]
    fn test_display_id_and_title() {
        let copy = instance(None);
        assert_eq!(copy.to_string(), format!("{} (Hobbit)", Uuid::nil()));
    }

    #[test]
    fn test_input_status_defaults_to_maintenance() {
        let input: BookInstanceInput =
            serde_json::from_value(serde_json::json!({ "book_id": 1, "imprint": "123" })).unwrap();
        assert_eq!(input.status_or_default(), LoanStatus::Maintenance);
    }

    #[test]
    fn test_input_rejects_long_imprint() {
        let input: BookInstanceInput =
            serde_json::from_value(serde_json::json!({ "imprint": "12345678" })).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_whitespace_imprint_is_required() {
        let input: BookInstanceInput =
            serde_json::from_value(serde_json::json!({ "book_id": 1, "imprint": "   " })).unwrap();
        assert!(input.validate().is_ok());
        match input.require_filled() {
            Err(AppError::Fields(fields)) => {
                assert_eq!(fields["imprint"], vec![FIELD_REQUIRED.to_string()])
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
