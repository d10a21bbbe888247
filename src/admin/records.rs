//! Field access for admin rendering

use std::fmt::Display;

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::fields::{ModelKind, STR_FIELD};
use crate::models::{Author, BookDetails, BookInstance, Genre, Language, User};

/// Record that the admin site can render generically
pub trait AdminRecord: Display {
    const MODEL: ModelKind;

    /// Primary key as it appears in URLs
    fn pk(&self) -> String;

    /// Cell text for a field; `None` when the value is empty
    fn display_value(&self, field: &str) -> Option<String>;

    /// Form value for a field
    fn raw_value(&self, field: &str) -> Value;

    /// Cell text, with `__str__` resolving to the display string
    fn cell(&self, field: &str) -> Option<String> {
        if field == STR_FIELD {
            return Some(self.to_string()).filter(|s| !s.is_empty());
        }
        self.display_value(field).filter(|s| !s.is_empty())
    }
}

fn date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

fn date_value(value: Option<NaiveDate>) -> Value {
    date(value).map(Value::String).unwrap_or(Value::Null)
}

impl AdminRecord for Genre {
    const MODEL: ModelKind = ModelKind::Genre;

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "name" => json!(self.name),
            _ => Value::Null,
        }
    }
}

impl AdminRecord for Language {
    const MODEL: ModelKind = ModelKind::Language;

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "name" => json!(self.name),
            _ => Value::Null,
        }
    }
}

impl AdminRecord for Author {
    const MODEL: ModelKind = ModelKind::Author;

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "first_name" => self.first_name.clone(),
            "surname" => self.surname.clone(),
            "date_of_birth" => date(self.date_of_birth),
            "date_of_death" => date(self.date_of_death),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "first_name" => json!(self.first_name),
            "surname" => json!(self.surname),
            "date_of_birth" => date_value(self.date_of_birth),
            "date_of_death" => date_value(self.date_of_death),
            _ => Value::Null,
        }
    }
}

impl AdminRecord for BookDetails {
    const MODEL: ModelKind = ModelKind::Book;

    fn pk(&self) -> String {
        self.book.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.book.id.to_string()),
            "title" => Some(self.book.title.clone()),
            "author" => self.author.as_ref().map(|a| a.to_string()),
            "summary" => Some(self.book.summary.clone()),
            "isbn" => Some(self.book.isbn.clone()),
            "genre" | "display_genre" => Some(self.display_genre.clone()),
            "language" => self.language.as_ref().map(|l| l.name.clone()),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.book.id),
            "title" => json!(self.book.title),
            "author" => json!(self.book.author_id),
            "summary" => json!(self.book.summary),
            "isbn" => json!(self.book.isbn),
            "genre" => json!(self.genres.iter().map(|g| g.id).collect::<Vec<_>>()),
            "language" => json!(self.book.language_id),
            "display_genre" => json!(self.display_genre),
            _ => Value::Null,
        }
    }
}

impl AdminRecord for BookInstance {
    const MODEL: ModelKind = ModelKind::BookInstance;

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "book" => Some(self.book_title.clone()),
            "imprint" => Some(self.imprint.clone()),
            "due_back" => date(self.due_back),
            "borrower" => self.borrower_username.clone(),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "book" => json!(self.book_id),
            "imprint" => json!(self.imprint),
            "due_back" => date_value(self.due_back),
            "borrower" => json!(self.borrower_id),
            "status" => json!(self.status.code()),
            _ => Value::Null,
        }
    }
}

impl AdminRecord for User {
    const MODEL: ModelKind = ModelKind::User;

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn display_value(&self, field: &str) -> Option<String> {
        let flag = |v: bool| Some(if v { "Yes" } else { "No" }.to_string());
        match field {
            "id" => Some(self.id.to_string()),
            "username" => Some(self.username.clone()),
            "first_name" => self.first_name.clone(),
            "last_name" => self.last_name.clone(),
            "email" => self.email.clone(),
            "is_active" => flag(self.is_active),
            "is_staff" => flag(self.is_staff),
            "is_superuser" => flag(self.is_superuser),
            _ => None,
        }
    }

    fn raw_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "username" => json!(self.username),
            "first_name" => json!(self.first_name),
            "last_name" => json!(self.last_name),
            "email" => json!(self.email),
            "is_active" => json!(self.is_active),
            "is_staff" => json!(self.is_staff),
            "is_superuser" => json!(self.is_superuser),
            _ => Value::Null,
        }
    }
}
