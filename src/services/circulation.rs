//! Circulation service: book instances and returns

use chrono::Local;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        book_instance::{BookInstance, BookInstanceInput, BookInstanceQuery},
        FIELD_REQUIRED,
    },
    repository::{
        book_instances::{DateCondition, InstanceFilter},
        Page, Repository,
    },
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List copies, soonest due first
    pub async fn list(&self, query: &BookInstanceQuery, page: Page) -> AppResult<(Vec<BookInstance>, i64)> {
        let filter = InstanceFilter {
            book_id: query.book_id,
            status: query.status,
            borrower_id: query.borrower_id,
            due_back: query
                .overdue
                .filter(|overdue| *overdue)
                .map(|_| DateCondition::Before(Local::now().date_naive())),
        };
        self.repository.book_instances.list(&filter, page).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.book_instances.get_by_id(id).await
    }

    /// Copies of a book
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        self.repository.books.get_by_id(book_id).await?;
        let filter = InstanceFilter {
            book_id: Some(book_id),
            ..Default::default()
        };
        let (instances, _) = self.repository.book_instances.list(&filter, Page::all()).await?;
        Ok(instances)
    }

    /// Register a copy; status defaults to maintenance
    pub async fn create(&self, data: &BookInstanceInput) -> AppResult<BookInstance> {
        data.require_filled()?;
        let book_id = self.check(data).await?;
        let instance = self
            .repository
            .book_instances
            .create(
                book_id,
                data.imprint.trim(),
                data.due_back,
                data.borrower_id,
                data.status_or_default(),
            )
            .await?;

        tracing::info!(
            instance_id = %instance.id,
            book_id = instance.book_id,
            status = instance.status.code(),
            "Book instance created"
        );
        Ok(instance)
    }

    /// Register a copy under a book
    pub async fn create_for_book(&self, book_id: i32, data: BookInstanceInput) -> AppResult<BookInstance> {
        self.repository.books.get_by_id(book_id).await?;
        self.create(&BookInstanceInput {
            book_id: Some(book_id),
            ..data
        })
        .await
    }

    pub async fn update(&self, id: Uuid, data: &BookInstanceInput) -> AppResult<BookInstance> {
        data.require_filled()?;
        self.repository.book_instances.get_by_id(id).await?;
        let book_id = self.check(data).await?;
        self.repository
            .book_instances
            .update(
                id,
                book_id,
                data.imprint.trim(),
                data.due_back,
                data.borrower_id,
                data.status_or_default(),
            )
            .await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.book_instances.delete(id).await?;
        tracing::info!(instance_id = %id, "Book instance deleted");
        Ok(())
    }

    /// Put a copy back on the shelf
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.mark_returned(id).await?;
        tracing::info!(instance_id = %id, "Book instance returned");
        Ok(instance)
    }

    /// Resolve the book and borrower references, returning the book ID
    async fn check(&self, data: &BookInstanceInput) -> AppResult<i32> {
        let mut errors = FieldErrors::new();

        let book_id = match data.book_id {
            Some(book_id) => match self.repository.books.get_by_id(book_id).await {
                Ok(_) => Some(book_id),
                Err(AppError::NotFound(_)) => {
                    errors.insert(
                        "book_id".to_string(),
                        vec![format!("Book {} does not exist", book_id)],
                    );
                    None
                }
                Err(e) => return Err(e),
            },
            None => {
                errors.insert("book_id".to_string(), vec![FIELD_REQUIRED.to_string()]);
                None
            }
        };

        if let Some(borrower_id) = data.borrower_id {
            match self.repository.users.get_by_id(borrower_id).await {
                Ok(_) => {}
                Err(AppError::NotFound(_)) => {
                    errors.insert(
                        "borrower_id".to_string(),
                        vec![format!("User {} does not exist", borrower_id)],
                    );
                }
                Err(e) => return Err(e),
            }
        }

        match book_id {
            Some(book_id) if errors.is_empty() => Ok(book_id),
            _ => Err(AppError::Fields(errors)),
        }
    }
}
