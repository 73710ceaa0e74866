//! Domain models for the catalog.
//!
//! These types represent validated domain objects separate from database row types.

pub mod author;
pub mod book;

pub use author::{AUTHOR_LIST_URL, Author, AuthorInput};
pub use book::{Book, BookInput, BookSummary};
