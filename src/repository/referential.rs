//! Referential actions applied when a referenced row is deleted.
//!
//! The schema declares plain foreign keys; what happens to dependent rows is
//! decided here, inside the deleting transaction: restrict rules are checked
//! first, then set-null and cascade rules run, then the row itself goes.

use sqlx::{Postgres, Transaction};

use crate::error::{AppError, AppResult};

/// Action taken on dependent rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Refuse the delete while dependents exist
    Restrict,
    /// Clear the dependent's reference
    SetNull,
    /// Remove the dependent rows (link tables only)
    Cascade,
}

/// A foreign key column and its delete rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
    /// Dependent record name used in messages
    pub dependent: &'static str,
}

pub const FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        table: "books",
        column: "author_id",
        references: "authors",
        on_delete: OnDelete::SetNull,
        dependent: "book",
    },
    ForeignKey {
        table: "books",
        column: "language_id",
        references: "languages",
        on_delete: OnDelete::SetNull,
        dependent: "book",
    },
    ForeignKey {
        table: "book_genres",
        column: "book_id",
        references: "books",
        on_delete: OnDelete::Cascade,
        dependent: "book genre link",
    },
    ForeignKey {
        table: "book_genres",
        column: "genre_id",
        references: "genres",
        on_delete: OnDelete::Cascade,
        dependent: "book genre link",
    },
    ForeignKey {
        table: "book_instances",
        column: "book_id",
        references: "books",
        on_delete: OnDelete::Restrict,
        dependent: "book instance",
    },
    ForeignKey {
        table: "book_instances",
        column: "borrower_id",
        references: "users",
        on_delete: OnDelete::SetNull,
        dependent: "book instance",
    },
];

/// Foreign keys pointing at `table`
pub fn dependents_of(table: &str) -> impl Iterator<Item = &'static ForeignKey> + '_ {
    FOREIGN_KEYS.iter().filter(move |fk| fk.references == table)
}

fn restricted_message(table: &str, id: i32, fk: &ForeignKey, count: i64) -> String {
    format!(
        "Cannot delete {} row {}: referenced by {} {}(s) through {}.{}",
        table, id, count, fk.dependent, fk.table, fk.column
    )
}

/// A dependent inserted after the restrict checks makes the plain foreign key
/// reject the final delete; report it like any other restricted delete.
fn map_restrict_violation(table: &str, id: i32, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_foreign_key_violation() {
            let message = format!(
                "Cannot delete {} row {}: still referenced ({})",
                table,
                id,
                db.constraint().unwrap_or("foreign key")
            );
            tracing::warn!("{}", message);
            return AppError::Restricted(message);
        }
    }
    AppError::Database(e)
}

/// Delete `table` row `id`, applying every rule of `dependents_of(table)`.
/// The caller owns the transaction and commits it.
pub async fn delete_with_rules(
    tx: &mut Transaction<'_, Postgres>,
    table: &'static str,
    id: i32,
) -> AppResult<()> {
    let rules: Vec<&ForeignKey> = dependents_of(table).collect();

    for fk in rules.iter().filter(|fk| fk.on_delete == OnDelete::Restrict) {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", fk.table, fk.column);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        if count > 0 {
            let message = restricted_message(table, id, fk, count);
            tracing::warn!("{}", message);
            return Err(AppError::Restricted(message));
        }
    }

    for fk in &rules {
        let sql = match fk.on_delete {
            OnDelete::SetNull => format!(
                "UPDATE {} SET {} = NULL WHERE {} = $1",
                fk.table, fk.column, fk.column
            ),
            OnDelete::Cascade => format!("DELETE FROM {} WHERE {} = $1", fk.table, fk.column),
            OnDelete::Restrict => continue,
        };
        let result = sqlx::query(&sql).bind(id).execute(&mut **tx).await?;
        if result.rows_affected() > 0 {
            tracing::debug!(
                "{:?} on {}.{}: {} row(s) for {} {}",
                fk.on_delete,
                fk.table,
                fk.column,
                result.rows_affected(),
                table,
                id
            );
        }
    }

    let sql = format!("DELETE FROM {} WHERE id = $1", table);
    let result = sqlx::query(&sql)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_restrict_violation(table, id, e))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("{} row {} not found", table, id)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(table: &str) -> Vec<(&'static str, &'static str, OnDelete)> {
        dependents_of(table)
            .map(|fk| (fk.table, fk.column, fk.on_delete))
            .collect()
    }

    #[test]
    fn test_books_restricted_by_instances() {
        let rules = actions("books");
        assert!(rules.contains(&("book_instances", "book_id", OnDelete::Restrict)));
        assert!(rules.contains(&("book_genres", "book_id", OnDelete::Cascade)));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_authors_and_languages_set_null() {
        assert_eq!(actions("authors"), vec![("books", "author_id", OnDelete::SetNull)]);
        assert_eq!(actions("languages"), vec![("books", "language_id", OnDelete::SetNull)]);
    }

    #[test]
    fn test_borrower_cleared_with_user() {
        assert_eq!(
            actions("users"),
            vec![("book_instances", "borrower_id", OnDelete::SetNull)]
        );
    }

    #[test]
    fn test_nothing_references_instances() {
        assert!(actions("book_instances").is_empty());
    }

    #[test]
    fn test_restricted_message_names_dependent() {
        let fk = dependents_of("books")
            .find(|fk| fk.on_delete == OnDelete::Restrict)
            .unwrap();
        let message = restricted_message("books", 4, fk, 2);
        assert_eq!(
            message,
            "Cannot delete books row 4: referenced by 2 book instance(s) through book_instances.book_id"
        );
    }

    #[derive(Debug)]
    struct PgViolation {
        foreign_key: bool,
        constraint: &'static str,
    }

    impl std::fmt::Display for PgViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "violates {}", self.constraint)
        }
    }

    impl std::error::Error for PgViolation {}

    impl sqlx::error::DatabaseError for PgViolation {
        fn message(&self) -> &str {
            self.constraint
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.foreign_key {
                sqlx::error::ErrorKind::ForeignKeyViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    fn violation(foreign_key: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgViolation {
            foreign_key,
            constraint: "book_instances_book_id_fkey",
        }))
    }

    #[test]
    fn test_late_dependent_is_restricted() {
        match map_restrict_violation("books", 4, violation(true)) {
            AppError::Restricted(message) => {
                assert!(message.contains("book_instances_book_id_fkey"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        assert!(matches!(
            map_restrict_violation("books", 4, violation(false)),
            AppError::Database(_)
        ));
        assert!(matches!(
            map_restrict_violation("books", 4, sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }
}
