//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, genre::Genre, language::Language};
use crate::error::AppResult;

/// Number of genres shown by `display_genre`
pub const DISPLAY_GENRE_LIMIT: usize = 3;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Comma-joined names of the first genres, in relation order
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(DISPLAY_GENRE_LIMIT)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Book with its relations resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    /// Genre column shown in list views
    pub display_genre: String,
}

impl BookDetails {
    pub fn new(
        book: Book,
        author: Option<Author>,
        language: Option<Language>,
        genres: Vec<Genre>,
    ) -> Self {
        let display_genre = display_genre(&genres);
        Self {
            book,
            author,
            language,
            genres,
            display_genre,
        }
    }
}

impl std::fmt::Display for BookDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.book.fmt(f)
    }
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    /// Enter the book's title
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    /// Set from the path when created inline under an author
    pub author_id: Option<i32>,
    /// Enter a brief description of the book
    #[validate(length(min = 1, max = 1000, message = "Summary must be between 1 and 1000 characters"))]
    pub summary: String,
    /// 13 Character ISBN number
    #[validate(length(min = 1, max = 13, message = "ISBN must be between 1 and 13 characters"))]
    pub isbn: String,
    /// Select a genre for this book
    #[validate(length(min = 1, message = "Select at least one genre"))]
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
}

impl BookInput {
    /// Trim text fields and drop repeated genre selections
    pub fn normalized(self) -> Self {
        let mut genre_ids = Vec::with_capacity(self.genre_ids.len());
        for id in self.genre_ids {
            if !genre_ids.contains(&id) {
                genre_ids.push(id);
            }
        }
        Self {
            title: self.title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            genre_ids,
            ..self
        }
    }

    /// Title, summary and ISBN must hold more than whitespace
    pub fn require_filled(&self) -> AppResult<()> {
        super::require_filled(&[
            ("title", &self.title),
            ("summary", &self.summary),
            ("isbn", &self.isbn),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::FIELD_REQUIRED};

    fn genres(names: &[&str]) -> Vec<Genre> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Genre {
                id: i as i32 + 1,
                name: name.to_string(),
            })
            .collect()
    }

    fn input() -> BookInput {
        BookInput {
            title: "The Hobbit".to_string(),
            author_id: None,
            summary: "There and back again.".to_string(),
            isbn: "9780261103344".to_string(),
            genre_ids: vec![1],
            language_id: None,
        }
    }

    #[test]
    fn test_display_genre_first_three() {
        let all = genres(&["Fantasy", "Adventure", "Classic", "Children", "Epic"]);
        assert_eq!(display_genre(&all), "Fantasy, Adventure, Classic");
    }

    #[test]
    fn test_display_genre_short_lists() {
        assert_eq!(display_genre(&[]), "");
        assert_eq!(display_genre(&genres(&["Poetry"])), "Poetry");
        assert_eq!(display_genre(&genres(&["Poetry", "Drama"])), "Poetry, Drama");
    }

    #[test]
    fn test_details_compute_display_genre() {
        let book = Book {
            id: 7,
            title: "The Hobbit".to_string(),
            author_id: None,
            summary: String::new(),
            isbn: "9780261103344".to_string(),
            language_id: None,
        };
        let details = BookDetails::new(book, None, None, genres(&["A", "B", "C", "D"]));
        assert_eq!(details.display_genre, "A, B, C");
        assert_eq!(details.to_string(), "The Hobbit");
    }

    #[test]
    fn test_input_rejects_long_isbn() {
        let mut data = input();
        data.isbn = "97802611033441".to_string();
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("isbn"));
    }

    #[test]
    fn test_input_requires_genre() {
        let mut data = input();
        data.genre_ids.clear();
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("genre_ids"));
    }

    #[test]
    fn test_normalized_dedups_genres() {
        let mut data = input();
        data.genre_ids = vec![3, 1, 3, 2, 1];
        data.isbn = " 9780261103344 ".to_string();
        let data = data.normalized();
        assert_eq!(data.genre_ids, vec![3, 1, 2]);
        assert_eq!(data.isbn, "9780261103344");
    }

    #[test]
    fn test_whitespace_only_fields_are_required() {
        let mut data = input();
        data.title = "   ".to_string();
        data.summary = "\t".to_string();
        data.isbn = "  ".to_string();
        assert!(data.validate().is_ok());
        match data.normalized().require_filled() {
            Err(AppError::Fields(fields)) => {
                for name in ["title", "summary", "isbn"] {
                    assert_eq!(fields[name], vec![FIELD_REQUIRED.to_string()]);
                }
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(input().normalized().require_filled().is_ok());
    }
}
