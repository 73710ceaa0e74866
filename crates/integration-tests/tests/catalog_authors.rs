//! Integration tests for the author pages.
//!
//! Every request goes through the full router over an in-memory store.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::NaiveDate;

use local_library_catalog::db::CatalogStore;
use local_library_core::AuthorId;
use local_library_integration_tests::{
    BookOutageStore, FailingStore, TestApp, TestResponse, author_input, book_input,
};

const AUSTEN_FORM: &str =
    "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16&date_of_death=1817-07-18";

/// A store failure surfaces as a bare 500 without internal detail.
fn assert_store_failure(res: &TestResponse) {
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, "Internal server error");
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_author_list() {
    let app = TestApp::new();

    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/catalog"));

    let res = app.get("/catalog").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/catalog/authors"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    assert_eq!(app.get("/health").await.body, "ok");
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);

    let failing = TestApp::with_store(FailingStore);
    assert_eq!(
        failing.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = TestApp::new();
    let res = app.get("/catalog/authors").await;

    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(res.headers["x-frame-options"], "DENY");
    assert_eq!(res.headers["x-content-type-options"], "nosniff");
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_sorted_by_family_name() {
    let app = TestApp::new();
    for (first, family) in [("Ben", "Bova"), ("Isaac", "Asimov"), ("Jim", "Jones")] {
        app.store
            .create_author(&author_input(first, family, None, None))
            .await
            .unwrap();
    }

    let res = app.get("/catalog/authors").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者リスト"));

    let asimov = res.body.find("Asimov, Isaac").unwrap();
    let bova = res.body.find("Bova, Ben").unwrap();
    let jones = res.body.find("Jones, Jim").unwrap();
    assert!(asimov < bova && bova < jones);
}

#[tokio::test]
async fn test_list_store_failure_is_500() {
    let app = TestApp::with_store(FailingStore);
    let res = app.get("/catalog/authors").await;

    assert_store_failure(&res);
    assert!(!res.body.contains("store unavailable"));
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_shows_author_and_books() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jane", "Austen", Some("1775-12-16"), None))
        .await
        .unwrap();
    app.store
        .create_book(&book_input(author.id, "Emma"))
        .await
        .unwrap();

    let res = app.get(&author.url()).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者詳細"));
    assert!(res.body.contains("Austen, Jane"));
    assert!(res.body.contains("1775年12月16日"));
    assert!(res.body.contains("Emma"));
    assert!(res.body.contains("Summary of Emma"));
}

#[tokio::test]
async fn test_detail_of_missing_author_is_404() {
    let app = TestApp::new();

    for uri in ["/catalog/author/42", "/catalog/author/nonexistent"] {
        let res = app.get(uri).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(res.body, "著者がありません。");
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_form_is_empty() {
    let app = TestApp::new();
    let res = app.get("/catalog/author/create").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者登録フォーム"));
    assert!(res.body.contains(r#"name="first_name" placeholder="First name" value="""#));
}

#[tokio::test]
async fn test_create_valid_author_redirects_to_detail() {
    let app = TestApp::new();
    let res = app.post_form("/catalog/author/create", AUSTEN_FORM).await;

    let authors = app.store.list_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    let author = &authors[0];
    assert_eq!(author.name(), "Austen, Jane");
    assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
    assert_eq!(author.date_of_death, NaiveDate::from_ymd_opt(1817, 7, 18));

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some(author.url().as_str()));
}

#[tokio::test]
async fn test_create_with_empty_first_name_reports_one_error() {
    let app = TestApp::new();
    let res = app
        .post_form(
            "/catalog/author/create",
            "first_name=&family_name=Austen&date_of_birth=&date_of_death=",
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.matches("<li data-field=").count(), 1);
    assert!(res.body.contains(r#"<li data-field="first_name">名を指定してください。</li>"#));
    assert!(!res.body.contains("名は半角アルファベットで指定してください。"));
    // Candidate values are echoed back.
    assert!(res.body.contains(r#"value="Austen""#));
    assert!(app.store.list_authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_missing_names_never_writes() {
    let app = TestApp::new();
    let res = app
        .post_form("/catalog/author/create", "date_of_birth=not-a-date")
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("名を指定してください。"));
    assert!(res.body.contains("氏を指定してください。"));
    assert!(res.body.contains("無効な生年月日です。"));
    assert!(res.body.contains(r#"value="not-a-date""#));
    assert!(app.store.list_authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_markup_in_names() {
    let app = TestApp::new();
    let res = app
        .post_form(
            "/catalog/author/create",
            "first_name=%3Cscript%3E&family_name=Austen",
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("名は半角アルファベットで指定してください。"));
    assert!(!res.body.contains("<script>"));
    assert!(app.store.list_authors().await.unwrap().is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_form_prefilled() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jane", "Austen", Some("1775-12-16"), None))
        .await
        .unwrap();

    let res = app.get(&format!("{}/update", author.url())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者更新"));
    assert!(res.body.contains(r#"value="Jane""#));
    assert!(res.body.contains(r#"value="1775-12-16""#));
}

#[tokio::test]
async fn test_update_form_of_missing_author_is_404() {
    let app = TestApp::new();
    let res = app.get("/catalog/author/9/update").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "著者がありません。");
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_identity() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input(
            "Jane",
            "Austen",
            Some("1775-12-16"),
            Some("1817-07-18"),
        ))
        .await
        .unwrap();
    let other = app
        .store
        .create_author(&author_input("Ben", "Bova", None, None))
        .await
        .unwrap();

    let res = app
        .post_form(
            &format!("{}/update", author.url()),
            &format!("id={}&first_name=Cassandra&family_name=Austen", other.id),
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some(author.url().as_str()));

    let updated = app.store.get_author(author.id).await.unwrap().unwrap();
    assert_eq!(updated.id, author.id);
    assert_eq!(updated.first_name, "Cassandra");
    assert_eq!(updated.date_of_birth, None);
    assert_eq!(updated.date_of_death, None);

    let untouched = app.store.get_author(other.id).await.unwrap().unwrap();
    assert_eq!(untouched, other);
}

#[tokio::test]
async fn test_invalid_update_leaves_record_unchanged() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jane", "Austen", None, None))
        .await
        .unwrap();

    let res = app
        .post_form(
            &format!("{}/update", author.url()),
            "first_name=Jane&family_name=",
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者更新"));
    assert!(res.body.contains("氏を指定してください。"));

    let stored = app.store.get_author(author.id).await.unwrap().unwrap();
    assert_eq!(stored, author);
}

#[tokio::test]
async fn test_update_of_missing_author_is_404() {
    let app = TestApp::new();
    let res = app
        .post_form("/catalog/author/5/update", AUSTEN_FORM)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(app.store.list_authors().await.unwrap().is_empty());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_form_of_missing_author_redirects() {
    let app = TestApp::new();

    for uri in ["/catalog/author/3/delete", "/catalog/author/nonexistent/delete"] {
        let res = app.get(uri).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(res.location(), Some("/catalog/authors"));
        assert!(res.body.is_empty());
    }
}

#[tokio::test]
async fn test_delete_form_lists_blocking_books() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jane", "Austen", None, None))
        .await
        .unwrap();
    app.store
        .create_book(&book_input(author.id, "Persuasion"))
        .await
        .unwrap();

    let res = app.get(&format!("{}/delete", author.url())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者削除"));
    assert!(res.body.contains("Persuasion"));
    assert!(!res.body.contains(r#"name="authorid""#));
}

#[tokio::test]
async fn test_delete_author_without_books() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jim", "Jones", None, None))
        .await
        .unwrap();

    let res = app.get(&format!("{}/delete", author.url())).await;
    assert!(res.body.contains(&format!(r#"name="authorid" value="{}""#, author.id)));

    let res = app
        .post_form(
            &format!("{}/delete", author.url()),
            &format!("authorid={}", author.id),
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/catalog/authors"));
    assert!(app.store.get_author(author.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_uses_body_id_not_path() {
    let app = TestApp::new();
    let kept = app
        .store
        .create_author(&author_input("Ben", "Bova", None, None))
        .await
        .unwrap();
    let removed = app
        .store
        .create_author(&author_input("Jim", "Jones", None, None))
        .await
        .unwrap();

    app.post_form(
        &format!("{}/delete", kept.url()),
        &format!("authorid={}", removed.id),
    )
    .await;

    assert!(app.store.get_author(kept.id).await.unwrap().is_some());
    assert!(app.store.get_author(removed.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_author_with_books_changes_nothing() {
    let app = TestApp::new();
    let author = app
        .store
        .create_author(&author_input("Jane", "Austen", None, None))
        .await
        .unwrap();
    app.store
        .create_book(&book_input(author.id, "Emma"))
        .await
        .unwrap();

    let res = app
        .post_form(
            &format!("{}/delete", author.url()),
            &format!("authorid={}", author.id),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("著者削除"));
    assert!(res.body.contains("Emma"));

    assert_eq!(
        app.store.get_author(author.id).await.unwrap(),
        Some(author.clone())
    );
    assert_eq!(
        app.store.list_books_by_author(author.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_delete_with_malformed_body_id_is_400() {
    let app = TestApp::new();
    let res = app
        .post_form("/catalog/author/1/delete", "authorid=abc")
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_missing_author_redirects_to_list() {
    let app = TestApp::new();
    let res = app
        .post_form("/catalog/author/8/delete", "authorid=8")
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/catalog/authors"));
    assert!(app.store.get_author(AuthorId::new(8)).await.unwrap().is_none());
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_failure_on_every_operation_is_500() {
    let app = TestApp::with_store(FailingStore);

    assert_store_failure(&app.get("/catalog/author/1").await);
    assert_store_failure(&app.get("/catalog/author/1/update").await);
    assert_store_failure(&app.get("/catalog/author/1/delete").await);
    assert_store_failure(&app.post_form("/catalog/author/create", AUSTEN_FORM).await);
    assert_store_failure(&app.post_form("/catalog/author/1/update", AUSTEN_FORM).await);
    assert_store_failure(&app.post_form("/catalog/author/1/delete", "authorid=1").await);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_failing_store() {
    let app = TestApp::with_store(FailingStore);
    let res = app
        .post_form("/catalog/author/create", "first_name=&family_name=Austen")
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("名を指定してください。"));
}

#[tokio::test]
async fn test_detail_fails_when_only_book_lookup_fails() {
    let app = TestApp::with_store(BookOutageStore::default());
    let author = app
        .store
        .inner
        .create_author(&author_input("Jane", "Austen", None, None))
        .await
        .unwrap();

    let res = app.get(&author.url()).await;
    assert_store_failure(&res);
    assert!(!res.body.contains("Austen"));
}

#[tokio::test]
async fn test_delete_fails_without_mutation_when_book_lookup_fails() {
    let app = TestApp::with_store(BookOutageStore::default());
    let author = app
        .store
        .inner
        .create_author(&author_input("Jim", "Jones", None, None))
        .await
        .unwrap();

    assert_store_failure(&app.get(&format!("{}/delete", author.url())).await);

    let res = app
        .post_form(
            &format!("{}/delete", author.url()),
            &format!("authorid={}", author.id),
        )
        .await;
    assert_store_failure(&res);
    assert_eq!(
        app.store.inner.get_author(author.id).await.unwrap(),
        Some(author)
    );
}

#[tokio::test]
async fn test_create_accepts_reduced_precision_dates() {
    let app = TestApp::new();
    let res = app
        .post_form(
            "/catalog/author/create",
            "first_name=Jane&family_name=Austen&date_of_birth=1775&date_of_death=1817-07-18+10%3A00",
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let authors = app.store.list_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].date_of_birth, NaiveDate::from_ymd_opt(1775, 1, 1));
    assert_eq!(authors[0].date_of_death, NaiveDate::from_ymd_opt(1817, 7, 18));

    for born in ["1775-12", "17751216"] {
        let res = app
            .post_form(
                "/catalog/author/create",
                &format!("first_name=Jane&family_name=Austen&date_of_birth={born}"),
            )
            .await;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "{born}");
    }
    assert_eq!(app.store.list_authors().await.unwrap().len(), 3);
}
