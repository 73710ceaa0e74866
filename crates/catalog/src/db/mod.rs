//! Storage for the catalog.
//!
//! # Backends
//!
//! - [`PgCatalogStore`] - `PostgreSQL`, schema `catalog`
//! - [`MemoryCatalogStore`] - process-local maps, used when no database URL
//!   is configured and by tests
//!
//! Handlers only see the [`CatalogStore`] trait through `AppState`.
//!
//! ## Tables
//!
//! - `author` - Authors (`first_name`, `family_name`, optional life dates)
//! - `book` - Books; `author_id` references `author` with `ON DELETE RESTRICT`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/catalog/migrations/` and run via:
//! ```bash
//! cargo run -p local-library-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use local_library_core::AuthorId;

use crate::models::{Author, AuthorInput, Book, BookInput, BookSummary};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., deleting an author that still has books).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations the catalog handlers depend on.
///
/// Lookups return `Ok(None)` for a missing record; only infrastructure
/// failures are errors.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All authors, ascending by family name.
    async fn list_authors(&self) -> Result<Vec<Author>, RepositoryError>;

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError>;

    /// Insert a new author and return it with its assigned ID.
    async fn create_author(&self, input: &AuthorInput) -> Result<Author, RepositoryError>;

    /// Replace every field of the author at `id`.
    ///
    /// Returns `Ok(None)` if no such author exists.
    async fn update_author(
        &self,
        id: AuthorId,
        input: &AuthorInput,
    ) -> Result<Option<Author>, RepositoryError>;

    /// Remove the author at `id`. Removing a missing author is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if books still reference the author.
    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError>;

    async fn create_book(&self, input: &BookInput) -> Result<Book, RepositoryError>;

    /// Full records of every book attributed to `author_id`.
    async fn list_books_by_author(&self, author_id: AuthorId)
    -> Result<Vec<Book>, RepositoryError>;

    /// Title and summary of every book attributed to `author_id`.
    async fn list_book_summaries_by_author(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<BookSummary>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
