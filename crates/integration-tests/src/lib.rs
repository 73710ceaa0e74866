//! Integration tests for the Local Library catalog.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p local-library-integration-tests
//! ```
//!
//! Tests drive the full router (middleware included) in-process with
//! `tower::ServiceExt::oneshot`; no server or database is started.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::NaiveDate;
use tower::ServiceExt;

use local_library_catalog::db::{CatalogStore, MemoryCatalogStore, RepositoryError};
use local_library_catalog::models::{Author, AuthorInput, Book, BookInput, BookSummary};
use local_library_catalog::routes;
use local_library_catalog::state::AppState;
use local_library_core::AuthorId;

/// A response collected into memory.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// The catalog router wired to a store the test can inspect.
pub struct TestApp<S> {
    pub store: Arc<S>,
    router: Router,
}

impl TestApp<MemoryCatalogStore> {
    /// App over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryCatalogStore::new())
    }
}

impl Default for TestApp<MemoryCatalogStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CatalogStore + 'static> TestApp<S> {
    /// App over the given store.
    pub fn with_store(store: S) -> Self {
        let store = Arc::new(store);
        let state = AppState::new(store.clone());
        let router = routes::app(state, Path::new("../catalog/static"));
        Self { store, router }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not UTF-8.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a URL-encoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not UTF-8.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = String::from_utf8(bytes.to_vec()).expect("UTF-8 body");
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Build author input from names and optional ISO dates.
///
/// # Panics
///
/// Panics if a date is not `YYYY-MM-DD`.
#[must_use]
pub fn author_input(first: &str, family: &str, born: Option<&str>, died: Option<&str>) -> AuthorInput {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("ISO date");
    AuthorInput {
        first_name: first.to_owned(),
        family_name: family.to_owned(),
        date_of_birth: born.map(parse),
        date_of_death: died.map(parse),
    }
}

/// Build book input for an author.
#[must_use]
pub fn book_input(author_id: AuthorId, title: &str) -> BookInput {
    BookInput {
        title: title.to_owned(),
        summary: format!("Summary of {title}"),
        isbn: "9780000000000".to_owned(),
        author_id,
    }
}

/// Store whose every operation fails, for exercising error paths.
#[derive(Debug, Default)]
pub struct FailingStore;

fn unavailable() -> RepositoryError {
    RepositoryError::DataCorruption("store unavailable".to_owned())
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn list_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        Err(unavailable())
    }

    async fn get_author(&self, _id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        Err(unavailable())
    }

    async fn create_author(&self, _input: &AuthorInput) -> Result<Author, RepositoryError> {
        Err(unavailable())
    }

    async fn update_author(
        &self,
        _id: AuthorId,
        _input: &AuthorInput,
    ) -> Result<Option<Author>, RepositoryError> {
        Err(unavailable())
    }

    async fn delete_author(&self, _id: AuthorId) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn create_book(&self, _input: &BookInput) -> Result<Book, RepositoryError> {
        Err(unavailable())
    }

    async fn list_books_by_author(
        &self,
        _author_id: AuthorId,
    ) -> Result<Vec<Book>, RepositoryError> {
        Err(unavailable())
    }

    async fn list_book_summaries_by_author(
        &self,
        _author_id: AuthorId,
    ) -> Result<Vec<BookSummary>, RepositoryError> {
        Err(unavailable())
    }
}

/// Memory store whose book lookups fail while author lookups succeed.
#[derive(Debug, Default)]
pub struct BookOutageStore {
    pub inner: MemoryCatalogStore,
}

#[async_trait]
impl CatalogStore for BookOutageStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }

    async fn list_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        self.inner.list_authors().await
    }

    async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        self.inner.get_author(id).await
    }

    async fn create_author(&self, input: &AuthorInput) -> Result<Author, RepositoryError> {
        self.inner.create_author(input).await
    }

    async fn update_author(
        &self,
        id: AuthorId,
        input: &AuthorInput,
    ) -> Result<Option<Author>, RepositoryError> {
        self.inner.update_author(id, input).await
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError> {
        self.inner.delete_author(id).await
    }

    async fn create_book(&self, input: &BookInput) -> Result<Book, RepositoryError> {
        self.inner.create_book(input).await
    }

    async fn list_books_by_author(
        &self,
        _author_id: AuthorId,
    ) -> Result<Vec<Book>, RepositoryError> {
        Err(unavailable())
    }

    async fn list_book_summaries_by_author(
        &self,
        _author_id: AuthorId,
    ) -> Result<Vec<BookSummary>, RepositoryError> {
        Err(unavailable())
    }
}
