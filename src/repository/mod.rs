//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod languages;
pub mod referential;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub genres: genres::GenresRepository,
    pub languages: languages::LanguagesRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            genres: genres::GenresRepository::new(pool.clone()),
            languages: languages::LanguagesRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// LIMIT/OFFSET window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// `None` binds NULL, i.e. LIMIT ALL
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Page {
    /// Every row
    pub fn all() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// 1-based page number; a page past the addressable range is a bad request
    pub fn number(page: i64, per_page: i64) -> AppResult<Self> {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest(format!("Page {} is out of range", page)))?;
        Ok(Self {
            limit: Some(per_page),
            offset,
        })
    }
}
