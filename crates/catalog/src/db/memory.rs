//! In-process catalog store.
//!
//! Mirrors the `PostgreSQL` backend's semantics, including the restriction on
//! deleting authors that still have books, so handlers behave identically on
//! either backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use local_library_core::{AuthorId, BookId};

use super::{CatalogStore, RepositoryError};
use crate::models::{Author, AuthorInput, Book, BookInput, BookSummary};

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<AuthorId, Author>,
    books: BTreeMap<BookId, Book>,
    last_author_id: i32,
    last_book_id: i32,
}

impl Tables {
    fn books_of(&self, author_id: AuthorId) -> impl Iterator<Item = &Book> {
        self.books
            .values()
            .filter(move |book| book.author_id == author_id)
    }
}

/// Catalog store holding every record in memory.
///
/// IDs are assigned sequentially from 1, so iteration order of the maps is
/// insertion order.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Advance a sequence, refusing to wrap.
fn next_id(last: &mut i32, table: &str) -> Result<i32, RepositoryError> {
    let next = last
        .checked_add(1)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("{table} id sequence exhausted")))?;
    *last = next;
    Ok(next)
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        // Stable sort: equal family names keep insertion order.
        authors.sort_by(|a, b| a.family_name.cmp(&b.family_name));
        Ok(authors)
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn create_author(&self, input: &AuthorInput) -> Result<Author, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = AuthorId::new(next_id(&mut tables.last_author_id, "author")?);
        let author = Author::from_input(id, input.clone());
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn update_author(
        &self,
        id: AuthorId,
        input: &AuthorInput,
    ) -> Result<Option<Author>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.authors.get_mut(&id) else {
            return Ok(None);
        };
        *slot = Author::from_input(id, input.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.books_of(id).next().is_some() {
            return Err(RepositoryError::Conflict(
                "author still has books".to_owned(),
            ));
        }
        tables.authors.remove(&id);
        Ok(())
    }

    async fn create_book(&self, input: &BookInput) -> Result<Book, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&input.author_id) {
            return Err(RepositoryError::Conflict(
                "author does not exist".to_owned(),
            ));
        }
        let id = BookId::new(next_id(&mut tables.last_book_id, "book")?);
        let book = Book {
            id,
            title: input.title.clone(),
            summary: input.summary.clone(),
            isbn: input.isbn.clone(),
            author_id: input.author_id,
        };
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    async fn list_books_by_author(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<Book>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.books_of(author_id).cloned().collect())
    }

    async fn list_book_summaries_by_author(
        &self,
        author_id: AuthorId,
    ) -> Result<Vec<BookSummary>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .books_of(author_id)
            .cloned()
            .map(BookSummary::from)
            .collect())
    }
}
