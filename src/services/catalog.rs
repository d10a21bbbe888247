//! Catalog service: genres, languages, authors and books

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        author::{Author, AuthorInput},
        book::{BookDetails, BookInput},
        genre::{Genre, GenreInput},
        language::{Language, LanguageInput},
        FIELD_REQUIRED,
    },
    repository::{
        books::{BookFilter, ISBN_TAKEN},
        Page, Repository,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    pub async fn list_genres(&self, page: Page) -> AppResult<(Vec<Genre>, i64)> {
        self.repository.genres.list(page).await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, data: &GenreInput) -> AppResult<Genre> {
        let genre = self.repository.genres.create(required_name(&data.name)?).await?;
        tracing::info!(genre_id = genre.id, "Genre created: {}", genre);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, data: &GenreInput) -> AppResult<Genre> {
        self.repository
            .genres
            .update(id, required_name(&data.name)?)
            .await
    }

    /// Delete a genre; books lose the genre
    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }

    // =========================================================================
    // LANGUAGES
    // =========================================================================

    pub async fn list_languages(&self, page: Page) -> AppResult<(Vec<Language>, i64)> {
        self.repository.languages.list(page).await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, data: &LanguageInput) -> AppResult<Language> {
        let language = self
            .repository
            .languages
            .create(required_name(&data.name)?)
            .await?;
        tracing::info!(language_id = language.id, "Language created: {}", language);
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, data: &LanguageInput) -> AppResult<Language> {
        self.repository
            .languages
            .update(id, required_name(&data.name)?)
            .await
    }

    /// Delete a language; its books keep existing without one
    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await?;
        tracing::info!(language_id = id, "Language deleted");
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self, page: Page) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create_author(&self, data: AuthorInput) -> AppResult<Author> {
        let author = self.repository.authors.create(&data.normalized()).await?;
        tracing::info!(author_id = author.id, "Author created: {}", author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, data: AuthorInput) -> AppResult<Author> {
        self.repository.authors.update(id, &data.normalized()).await
    }

    /// Delete an author; their books keep existing without one
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    /// Books written by an author
    pub async fn author_books(&self, author_id: i32) -> AppResult<Vec<BookDetails>> {
        self.repository.authors.get_by_id(author_id).await?;
        let filter = BookFilter {
            author_id: Some(author_id),
        };
        let (books, _) = self.repository.books.list(&filter, Page::all()).await?;
        Ok(books)
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn list_books(&self, filter: &BookFilter, page: Page) -> AppResult<(Vec<BookDetails>, i64)> {
        self.repository.books.list(filter, page).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, data: BookInput) -> AppResult<BookDetails> {
        let data = data.normalized();
        data.require_filled()?;
        self.check_book(&data, None).await?;

        let book = self.repository.books.create(&data).await?;
        tracing::info!(book_id = book.book.id, isbn = %book.book.isbn, "Book created: {}", book);
        Ok(book)
    }

    /// Create a book under an author
    pub async fn create_author_book(&self, author_id: i32, data: BookInput) -> AppResult<BookDetails> {
        self.repository.authors.get_by_id(author_id).await?;
        self.create_book(BookInput {
            author_id: Some(author_id),
            ..data
        })
        .await
    }

    pub async fn update_book(&self, id: i32, data: BookInput) -> AppResult<BookDetails> {
        let data = data.normalized();
        data.require_filled()?;
        self.repository.books.get_by_id(id).await?;
        self.check_book(&data, Some(id)).await?;

        self.repository.books.update(id, &data).await
    }

    /// Delete a book; refused while copies of it exist
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Field errors for references and ISBN uniqueness
    async fn check_book(&self, data: &BookInput, exclude_id: Option<i32>) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        let mut add = |field: &str, message: String| {
            errors.entry(field.to_string()).or_default().push(message);
        };

        if self.repository.books.isbn_exists(&data.isbn, exclude_id).await? {
            add("isbn", ISBN_TAKEN.to_string());
        }
        if let Some(author_id) = data.author_id {
            match self.repository.authors.get_by_id(author_id).await {
                Err(AppError::NotFound(_)) => {
                    add("author_id", format!("Author {} does not exist", author_id))
                }
                other => {
                    other?;
                }
            }
        }
        if let Some(language_id) = data.language_id {
            match self.repository.languages.get_by_id(language_id).await {
                Err(AppError::NotFound(_)) => {
                    add("language_id", format!("Language {} does not exist", language_id))
                }
                other => {
                    other?;
                }
            }
        }
        let found = self.repository.genres.get_many(&data.genre_ids).await?;
        for id in &data.genre_ids {
            if !found.iter().any(|g| g.id == *id) {
                add("genre_ids", format!("Genre {} does not exist", id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Fields(errors))
        }
    }
}

/// Trimmed, non-blank name
fn required_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::field("name", FIELD_REQUIRED));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("  Poetry ").unwrap(), "Poetry");
        match required_name("   ") {
            Err(AppError::Fields(fields)) => assert!(fields.contains_key("name")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
