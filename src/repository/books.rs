//! Books repository

use std::collections::HashMap;

use sqlx::{postgres::PgRow, FromRow, Pool, Postgres, Row};

use super::{referential, Page};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookDetails, BookInput},
        genre::Genre,
        language::Language,
    },
};

/// Message for the ISBN uniqueness rule
pub const ISBN_TAKEN: &str = "Book with this ISBN already exists.";

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, b.summary, b.isbn, b.language_id,
           a.first_name AS author_first_name, a.surname AS author_surname,
           a.date_of_birth AS author_date_of_birth, a.date_of_death AS author_date_of_death,
           l.name AS language_name
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
    LEFT JOIN languages l ON l.id = b.language_id
"#;

/// Book list filters
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author_id: Option<i32>,
}

/// Maps the unique index violation on ISBN to a field error
fn map_isbn_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.constraint() == Some("books_isbn_key") {
            return AppError::field("isbn", ISBN_TAKEN);
        }
    }
    AppError::Database(e)
}

/// Build book, author and language from a `BOOK_SELECT` row
fn book_from_row(row: &PgRow) -> AppResult<(Book, Option<Author>, Option<Language>)> {
    let book = Book::from_row(row)?;

    let author = book.author_id.map(|id| Author {
        id,
        first_name: row.get("author_first_name"),
        surname: row.get("author_surname"),
        date_of_birth: row.get("author_date_of_birth"),
        date_of_death: row.get("author_date_of_death"),
    });

    let language_name: Option<String> = row.get("language_name");
    let language = book
        .language_id
        .zip(language_name)
        .map(|(id, name)| Language { id, name });

    Ok((book, author, language))
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books ordered by title then author, with the total count
    pub async fn list(&self, filter: &BookFilter, page: Page) -> AppResult<(Vec<BookDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE ($1::int IS NULL OR author_id = $1)",
        )
        .bind(filter.author_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"{}
            WHERE ($1::int IS NULL OR b.author_id = $1)
            ORDER BY b.title, a.surname, a.first_name, b.id
            LIMIT $2 OFFSET $3
            "#,
            BOOK_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(filter.author_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        let parts = rows.iter().map(book_from_row).collect::<AppResult<Vec<_>>>()?;
        let ids: Vec<i32> = parts.iter().map(|(book, _, _)| book.id).collect();
        let mut genres = self.genres_for(&ids).await?;

        let books = parts
            .into_iter()
            .map(|(book, author, language)| {
                let book_genres = genres.remove(&book.id).unwrap_or_default();
                BookDetails::new(book, author, language, book_genres)
            })
            .collect();

        Ok((books, total))
    }

    /// Get book by ID with author, language and genres
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        let sql = format!("{} WHERE b.id = $1", BOOK_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let (book, author, language) = book_from_row(&row)?;
        let genres = self.genres_for(&[id]).await?.remove(&id).unwrap_or_default();

        Ok(BookDetails::new(book, author, language, genres))
    }

    /// Genres of each book, in link insertion order
    pub async fn genres_for(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Genre>>> {
        let rows = sqlx::query(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = ANY($1)
            ORDER BY bg.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i32, Vec<Genre>> = HashMap::new();
        for row in rows {
            genres.entry(row.get("book_id")).or_default().push(Genre {
                id: row.get("id"),
                name: row.get("name"),
            });
        }
        Ok(genres)
    }

    /// Check whether another book already uses this ISBN
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id != $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Number of instances of a book
    pub async fn count_instances(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE book_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a book and link its genres in the given order
    pub async fn create(&self, data: &BookInput) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_isbn_violation)?;

        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get_by_id(id).await
    }

    /// Update a book, replacing its genre links
    pub async fn update(&self, id: i32, data: &BookInput) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_isbn_violation)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get_by_id(id).await
    }

    /// Delete a book; refused while instances of it exist
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        referential::delete_with_rules(&mut tx, "books", id).await?;
        tx.commit().await?;
        Ok(())
    }
}
