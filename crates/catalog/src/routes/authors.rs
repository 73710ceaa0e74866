//! Author route handlers.
//!
//! List, detail, create, update and delete for authors. Form submissions that
//! fail validation re-render the form with every message; successful writes
//! redirect to the affected page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use local_library_core::AuthorId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{AUTHOR_LIST_URL, Author, Book, BookSummary};
use crate::state::AppState;
use crate::validation::{AuthorForm, ValidationErrors, validate_author};

// =============================================================================
// Page Titles
// =============================================================================

const LIST_TITLE: &str = "著者リスト";
const DETAIL_TITLE: &str = "著者詳細";
const CREATE_TITLE: &str = "著者登録フォーム";
const UPDATE_TITLE: &str = "著者更新";
const DELETE_TITLE: &str = "著者削除";

// =============================================================================
// Form Inputs
// =============================================================================

/// Body of the delete confirmation form.
#[derive(Debug, Deserialize)]
pub struct DeleteAuthorForm {
    #[serde(default)]
    pub authorid: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Author view for templates.
#[derive(Debug, Clone)]
pub struct AuthorView {
    pub url: String,
    pub name: String,
    pub lifespan: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    pub date_of_birth: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    pub date_of_death: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            url: author.url(),
            name: author.name(),
            lifespan: author.lifespan(),
            date_of_birth: format_date(author.date_of_birth),
            date_of_death: format_date(author.date_of_death),
        }
    }
}

/// Values pre-filled into the author form.
///
/// Dates are kept as text so a rejected submission is shown back exactly as
/// typed (after trimming).
#[derive(Debug, Clone, Default)]
pub struct AuthorFormView {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl From<&Author> for AuthorFormView {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: format_date(author.date_of_birth),
            date_of_death: format_date(author.date_of_death),
        }
    }
}

impl From<AuthorForm> for AuthorFormView {
    fn from(form: AuthorForm) -> Self {
        let form = form.trimmed();
        Self {
            first_name: form.first_name,
            family_name: form.family_name,
            date_of_birth: form.date_of_birth,
            date_of_death: form.date_of_death,
        }
    }
}

/// Book view for templates.
#[derive(Debug, Clone)]
pub struct BookView {
    pub url: String,
    pub title: String,
    pub summary: String,
}

impl From<BookSummary> for BookView {
    fn from(book: BookSummary) -> Self {
        Self {
            url: book.url(),
            title: book.title,
            summary: book.summary,
        }
    }
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        BookSummary::from(book).into()
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// =============================================================================
// Templates
// =============================================================================

/// Author list page.
#[derive(Template, WebTemplate)]
#[template(path = "author_list.html")]
pub struct AuthorListTemplate {
    pub title: &'static str,
    pub author_list: Vec<AuthorView>,
}

/// Author detail page.
#[derive(Template, WebTemplate)]
#[template(path = "author_detail.html")]
pub struct AuthorDetailTemplate {
    pub title: &'static str,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

/// Create/update form page.
#[derive(Template, WebTemplate)]
#[template(path = "author_form.html")]
pub struct AuthorFormTemplate {
    pub title: &'static str,
    pub author: AuthorFormView,
    /// Failed rules in field order.
    pub errors: ValidationErrors,
}

/// Delete confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "author_delete.html")]
pub struct AuthorDeleteTemplate {
    pub title: &'static str,
    pub author_id: String,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

impl AuthorDeleteTemplate {
    fn new(author: &Author, books: Vec<Book>) -> Self {
        Self {
            title: DELETE_TITLE,
            author_id: author.id.to_string(),
            author: AuthorView::from(author),
            author_books: books.into_iter().map(BookView::from).collect(),
        }
    }
}

/// Parse an author ID from a path segment; anything unparseable is absent.
fn parse_author_id(raw: &str) -> Option<AuthorId> {
    raw.parse().ok()
}

fn to_author_list() -> Response {
    Redirect::to(AUTHOR_LIST_URL).into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Author list, ascending by family name.
///
/// GET /catalog/authors
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<AuthorListTemplate> {
    let authors = state.store().list_authors().await?;
    tracing::debug!(count = authors.len(), "Listed authors");

    Ok(AuthorListTemplate {
        title: LIST_TITLE,
        author_list: authors.iter().map(AuthorView::from).collect(),
    })
}

/// Author detail with the author's books.
///
/// GET /catalog/author/{id}
///
/// # Errors
///
/// Returns 404 if the author doesn't exist.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<AuthorDetailTemplate> {
    let id = parse_author_id(&id).ok_or_else(AppError::author_not_found)?;
    let store = state.store();

    let (author, books) = tokio::try_join!(
        store.get_author(id),
        store.list_book_summaries_by_author(id)
    )?;
    let author = author.ok_or_else(AppError::author_not_found)?;

    Ok(AuthorDetailTemplate {
        title: DETAIL_TITLE,
        author: AuthorView::from(&author),
        author_books: books.into_iter().map(BookView::from).collect(),
    })
}

/// Empty author form.
///
/// GET /catalog/author/create
pub async fn create_form() -> AuthorFormTemplate {
    AuthorFormTemplate {
        title: CREATE_TITLE,
        author: AuthorFormView::default(),
        errors: ValidationErrors::default(),
    }
}

/// Create an author.
///
/// POST /catalog/author/create
#[instrument(skip_all)]
pub async fn create_submit(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Result<Response> {
    let input = match validate_author(&form) {
        Ok(input) => input,
        Err(errors) => {
            tracing::info!(errors = errors.len(), "Author form rejected");
            return Ok(AuthorFormTemplate {
                title: CREATE_TITLE,
                author: AuthorFormView::from(form),
                errors,
            }
            .into_response());
        }
    };

    let author = state.store().create_author(&input).await?;
    tracing::info!(author_id = %author.id, "Author created");

    Ok(Redirect::to(&author.url()).into_response())
}

/// Delete confirmation page.
///
/// GET /catalog/author/{id}/delete
///
/// Redirects to the author list when the author doesn't exist.
#[instrument(skip(state))]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(id) = parse_author_id(&id) else {
        return Ok(to_author_list());
    };
    let store = state.store();

    let (author, books) =
        tokio::try_join!(store.get_author(id), store.list_books_by_author(id))?;
    let Some(author) = author else {
        return Ok(to_author_list());
    };

    Ok(AuthorDeleteTemplate::new(&author, books).into_response())
}

/// Delete an author that has no books.
///
/// POST /catalog/author/{id}/delete
///
/// The author to delete is taken from the `authorid` form field, not the
/// path. An author who still has books is shown the confirmation page again
/// and left untouched.
#[instrument(skip(state))]
pub async fn delete_submit(
    State(state): State<AppState>,
    Form(form): Form<DeleteAuthorForm>,
) -> Result<Response> {
    let id = parse_author_id(&form.authorid)
        .ok_or_else(|| AppError::BadRequest("invalid author id".to_owned()))?;
    let store = state.store();

    let (author, books) =
        tokio::try_join!(store.get_author(id), store.list_books_by_author(id))?;

    if !books.is_empty() {
        tracing::info!(author_id = %id, books = books.len(), "Author delete blocked by books");
        // Books pointing at a vanished author: nothing left to confirm.
        let Some(author) = author else {
            return Ok(to_author_list());
        };
        return Ok(AuthorDeleteTemplate::new(&author, books).into_response());
    }

    store.delete_author(id).await?;
    tracing::info!(author_id = %id, "Author deleted");

    Ok(to_author_list())
}

/// Author form pre-filled for editing.
///
/// GET /catalog/author/{id}/update
///
/// # Errors
///
/// Returns 404 if the author doesn't exist.
#[instrument(skip(state))]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<AuthorFormTemplate> {
    let id = parse_author_id(&id).ok_or_else(AppError::author_not_found)?;
    let author = state
        .store()
        .get_author(id)
        .await?
        .ok_or_else(AppError::author_not_found)?;

    Ok(AuthorFormTemplate {
        title: UPDATE_TITLE,
        author: AuthorFormView::from(&author),
        errors: ValidationErrors::default(),
    })
}

/// Replace an author's fields.
///
/// POST /catalog/author/{id}/update
///
/// The record keeps the ID from the path whatever the body contains.
///
/// # Errors
///
/// Returns 404 if the author doesn't exist.
#[instrument(skip(state, form))]
pub async fn update_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> Result<Response> {
    let id = parse_author_id(&id).ok_or_else(AppError::author_not_found)?;

    let input = match validate_author(&form) {
        Ok(input) => input,
        Err(errors) => {
            tracing::info!(author_id = %id, errors = errors.len(), "Author form rejected");
            return Ok(AuthorFormTemplate {
                title: UPDATE_TITLE,
                author: AuthorFormView::from(form),
                errors,
            }
            .into_response());
        }
    };

    let author = state
        .store()
        .update_author(id, &input)
        .await?
        .ok_or_else(AppError::author_not_found)?;
    tracing::info!(author_id = %author.id, "Author updated");

    Ok(Redirect::to(&author.url()).into_response())
}
