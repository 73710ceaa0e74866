//! `PostgreSQL` catalog store.
//!
//! Queries are checked at runtime (`query_as` with `FromRow` row types) so the
//! crate builds without a live database.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use local_library_core::{AuthorId, BookId};

use super::{CatalogStore, RepositoryError};
use crate::models::{Author, AuthorInput, Book, BookInput, BookSummary};

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for author queries.
#[derive(Debug, sqlx::FromRow)]
struct AuthorRow {
    id: i32,
    first_name: String,
    family_name: String,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: AuthorId::new(row.id),
            first_name: row.first_name,
            family_name: row.family_name,
            date_of_birth: row.date_of_birth,
            date_of_death: row.date_of_death,
        }
    }
}

/// Internal row type for book queries.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i32,
    title: String,
    summary: String,
    isbn: String,
    author_id: i32,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.title,
            summary: row.summary,
            isbn: row.isbn,
            author_id: AuthorId::new(row.author_id),
        }
    }
}

/// Internal row type for projected book queries.
#[derive(Debug, sqlx::FromRow)]
struct BookSummaryRow {
    id: i32,
    title: String,
    summary: String,
}

impl From<BookSummaryRow> for BookSummary {
    fn from(row: BookSummaryRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.title,
            summary: row.summary,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Catalog store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            r"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM catalog.author
            ORDER BY family_name ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM catalog.author
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Author::from))
    }

    async fn create_author(&self, input: &AuthorInput) -> Result<Author, RepositoryError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r"
            INSERT INTO catalog.author (first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            ",
        )
        .bind(&input.first_name)
        .bind(&input.family_name)
        .bind(input.date_of_birth)
        .bind(input.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_author(
        &self,
        id: AuthorId,
        input: &AuthorInput,
    ) -> Result<Option<Author>, RepositoryError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r"
            UPDATE catalog.author
            SET first_name = $2,
                family_name = $3,
                date_of_birth = $4,
                date_of_death = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            ",
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.family_name)
        .bind(input.date_of_birth)
        .bind(input.date_of_death)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Author::from))
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM catalog.author WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
                {
                    return RepositoryError::Conflict("author still has books".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(())
    }

    async fn create_book(&self, input: &BookInput) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO catalog.book (title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, summary, isbn, author_id
            ",
        )
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.isbn)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
            {
                return RepositoryError::Conflict("author does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    async fn list_books_by_author(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, summary, isbn, author_id
            FROM catalog.book
            WHERE author_id = $1
            ORDER BY id
            ",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn list_book_summaries_by_author(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<BookSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(
            r"
            SELECT id, title, summary
            FROM catalog.book
            WHERE author_id = $1
            ORDER BY id
            ",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookSummary::from).collect())
    }
}
