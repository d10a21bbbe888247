//! Book instances repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::Page;
use crate::{
    error::{AppError, AppResult},
    models::{book_instance::BookInstance, enums::LoanStatus},
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
           bi.borrower_id, u.username AS borrower_username, bi.status
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
    LEFT JOIN users u ON u.id = bi.borrower_id
"#;

/// Condition on the `due_back` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCondition {
    IsNull,
    IsNotNull,
    /// `from` inclusive, `until` exclusive
    Between { from: NaiveDate, until: NaiveDate },
    Before(NaiveDate),
}

/// Book instance list filters
#[derive(Debug, Clone, Default)]
pub struct InstanceFilter {
    pub book_id: Option<i32>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
    pub due_back: Option<DateCondition>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &InstanceFilter) {
    builder.push(" WHERE 1=1");
    if let Some(book_id) = filter.book_id {
        builder.push(" AND bi.book_id = ").push_bind(book_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND bi.status = ").push_bind(status);
    }
    if let Some(borrower_id) = filter.borrower_id {
        builder.push(" AND bi.borrower_id = ").push_bind(borrower_id);
    }
    match filter.due_back {
        Some(DateCondition::IsNull) => {
            builder.push(" AND bi.due_back IS NULL");
        }
        Some(DateCondition::IsNotNull) => {
            builder.push(" AND bi.due_back IS NOT NULL");
        }
        Some(DateCondition::Between { from, until }) => {
            builder
                .push(" AND bi.due_back >= ")
                .push_bind(from)
                .push(" AND bi.due_back < ")
                .push_bind(until);
        }
        Some(DateCondition::Before(date)) => {
            builder.push(" AND bi.due_back < ").push_bind(date);
        }
        None => {}
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List instances ordered by due date (undated last), with the total count
    pub async fn list(&self, filter: &InstanceFilter, page: Page) -> AppResult<(Vec<BookInstance>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM book_instances bi");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(INSTANCE_SELECT);
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY bi.due_back ASC NULLS LAST, bi.id LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);
        let rows = query
            .build_query_as::<BookInstance>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let sql = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        sqlx::query_as::<_, BookInstance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Create an instance with a freshly generated UUID
    pub async fn create(
        &self,
        book_id: i32,
        imprint: &str,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
        status: LoanStatus,
    ) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(book_id)
        .bind(imprint)
        .bind(due_back)
        .bind(borrower_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        book_id: i32,
        imprint: &str,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
        status: LoanStatus,
    ) -> AppResult<BookInstance> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, due_back = $3, borrower_id = $4, status = $5
            WHERE id = $6
            "#,
        )
        .bind(book_id)
        .bind(imprint)
        .bind(due_back)
        .bind(borrower_id)
        .bind(status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Back on the shelf: available, no due date, no borrower
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET status = $1, due_back = NULL, borrower_id = NULL
            WHERE id = $2
            "#,
        )
        .bind(LoanStatus::Available)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Delete an instance (nothing references instances)
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
