//! Book domain types.
//!
//! Books are owned elsewhere in the catalog; the author pages only read them
//! (and the delete workflow refuses to orphan them).

use serde::{Deserialize, Serialize};

use local_library_core::{AuthorId, BookId};

/// A catalogued book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    /// Author this book is attributed to.
    pub author_id: AuthorId,
}

impl Book {
    /// Detail page path for this book.
    #[must_use]
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// Projection of a book carrying only what the author detail page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub summary: String,
}

impl BookSummary {
    /// Detail page path for this book.
    #[must_use]
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            summary: book.summary,
        }
    }
}

/// Detail page path for a book ID.
#[must_use]
pub fn book_url(id: BookId) -> String {
    format!("/catalog/book/{id}")
}

/// Fields for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: AuthorId,
}
