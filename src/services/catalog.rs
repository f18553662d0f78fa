//! Catalog management service

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook},
    repository::BookStore,
};

/// Orchestrates the book lifecycle: uniqueness on create, explicit not-found
/// on reads, re-fetch→merge→save on edits so audit lineage and the version
/// token survive every write.
///
/// The acting principal is threaded in as an explicit parameter on writes
/// instead of being read from ambient request state.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// List all books. An empty catalog yields an empty list.
    pub async fn view_book_list(&self) -> AppResult<Vec<Book>> {
        self.store.find_all().await
    }

    /// Get a book by ISBN. Absence is always signalled as `BookNotFound`.
    pub async fn view_book_details(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::BookNotFound {
                isbn: isbn.to_string(),
            })
    }

    /// Add a new book. Fails with `BookAlreadyExists` when the ISBN is taken.
    /// The persisted book carries `version = 0` and matching audit stamps.
    pub async fn add_book_to_catalog(
        &self,
        book: CreateBook,
        principal: &str,
    ) -> AppResult<Book> {
        book.validate()?;
        require_principal(principal)?;

        if self.store.exists_by_isbn(&book.isbn).await? {
            return Err(AppError::BookAlreadyExists { isbn: book.isbn });
        }

        tracing::info!("Adding book {} to the catalog", book.isbn);

        let now = Utc::now();
        self.store
            .save(Book {
                id: None,
                isbn: book.isbn,
                title: book.title,
                author: book.author,
                price: book.price,
                publisher: book.publisher,
                version: 0,
                created_at: Some(now),
                last_modified_at: Some(now),
                created_by: Some(principal.to_string()),
                last_modified_by: Some(principal.to_string()),
            })
            .await
    }

    /// Remove a book. Deleting an absent ISBN is a no-op.
    pub async fn remove_book_from_catalog(&self, isbn: &str) -> AppResult<()> {
        tracing::info!("Removing book {} from the catalog", isbn);
        self.store.delete_by_isbn(isbn).await
    }

    /// Replace the mutable fields of an existing book, keeping its identity,
    /// audit lineage and version token. When no book exists with `isbn`, the
    /// patch is inserted as a brand-new book under the patch's own ISBN:
    /// edit is create-or-replace, not update-or-fail.
    pub async fn edit_book_details(
        &self,
        isbn: &str,
        patch: CreateBook,
        principal: &str,
    ) -> AppResult<Book> {
        patch.validate()?;
        require_principal(principal)?;

        match self.store.find_by_isbn(isbn).await? {
            Some(existing) => {
                tracing::info!("Updating book {} in the catalog", existing.isbn);
                self.store
                    .save(Book {
                        id: existing.id,
                        isbn: existing.isbn,
                        title: patch.title,
                        author: patch.author,
                        price: patch.price,
                        publisher: patch.publisher,
                        // Concurrency token: the store rejects it if stale
                        version: existing.version,
                        created_at: existing.created_at,
                        created_by: existing.created_by,
                        last_modified_at: Some(Utc::now()),
                        last_modified_by: Some(principal.to_string()),
                    })
                    .await
            }
            None => self.add_book_to_catalog(patch, principal).await,
        }
    }
}

/// A write must never be attributed to a missing principal, even though the
/// route policy already rejects unauthenticated writes.
fn require_principal(principal: &str) -> AppResult<()> {
    if principal.is_empty() {
        return Err(AppError::Authentication(
            "A write requires an authenticated principal".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBookStore;
    use mockall::predicate::eq;

    const ISBN: &str = "7373731394";

    fn draft() -> CreateBook {
        CreateBook {
            isbn: ISBN.to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            price: 9.90,
            publisher: Some("Polarsophia".to_string()),
        }
    }

    fn stored_book() -> Book {
        Book {
            id: Some(42),
            isbn: ISBN.to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            price: 9.90,
            publisher: Some("Polarsophia".to_string()),
            version: 3,
            created_at: Some(Utc::now()),
            last_modified_at: Some(Utc::now()),
            created_by: Some("isabelle".to_string()),
            last_modified_by: Some("isabelle".to_string()),
        }
    }

    fn service(store: MockBookStore) -> CatalogService {
        CatalogService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn view_details_of_missing_book_fails_explicitly() {
        let mut store = MockBookStore::new();
        store
            .expect_find_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(None));

        let err = service(store).view_book_details(ISBN).await.unwrap_err();
        assert!(matches!(err, AppError::BookNotFound { isbn } if isbn == ISBN));
    }

    #[tokio::test]
    async fn view_details_returns_existing_book() {
        let mut store = MockBookStore::new();
        store
            .expect_find_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(Some(stored_book())));

        let book = service(store).view_book_details(ISBN).await.unwrap();
        assert_eq!(book.isbn, ISBN);
    }

    #[tokio::test]
    async fn add_assigns_version_zero_and_audit_stamps() {
        let mut store = MockBookStore::new();
        store
            .expect_exists_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(false));
        store
            .expect_save()
            .withf(|book| {
                book.id.is_none()
                    && book.version == 0
                    && book.created_by.as_deref() == Some("isabelle")
                    && book.last_modified_by.as_deref() == Some("isabelle")
                    && book.created_at.is_some()
                    && book.created_at == book.last_modified_at
            })
            .returning(|book| Ok(book));

        let created = service(store)
            .add_book_to_catalog(draft(), "isabelle")
            .await
            .unwrap();
        assert_eq!(created.version, 0);
        assert_eq!(created.created_by.as_deref(), Some("isabelle"));
    }

    #[tokio::test]
    async fn add_rejects_duplicate_isbn() {
        let mut store = MockBookStore::new();
        store
            .expect_exists_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(true));
        // No save expectation: a call would panic the test

        let err = service(store)
            .add_book_to_catalog(draft(), "isabelle")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookAlreadyExists { isbn } if isbn == ISBN));
    }

    #[tokio::test]
    async fn validation_happens_before_any_store_call() {
        // No expectations at all: the store must observably receive zero calls
        let svc = service(MockBookStore::new());

        let mut invalid = draft();
        invalid.price = 0.0;
        let err = svc
            .add_book_to_catalog(invalid, "isabelle")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut invalid = draft();
        invalid.title.clear();
        let err = svc
            .edit_book_details(ISBN, invalid, "isabelle")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn write_without_principal_is_rejected() {
        let mut store = MockBookStore::new();
        store.expect_exists_by_isbn().never();
        store.expect_save().never();

        let err = service(store)
            .add_book_to_catalog(draft(), "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn edit_preserves_audit_lineage_and_carries_version_token() {
        let mut store = MockBookStore::new();
        let existing = stored_book();
        let created_at = existing.created_at;
        store
            .expect_find_by_isbn()
            .with(eq(ISBN))
            .returning(move |_| Ok(Some(existing.clone())));
        store
            .expect_save()
            .withf(move |book| {
                book.id == Some(42)
                    && book.version == 3
                    && book.created_by.as_deref() == Some("isabelle")
                    && book.created_at == created_at
                    && book.last_modified_by.as_deref() == Some("bjorn")
                    && book.title == "New Title"
            })
            .returning(|mut book| {
                book.version += 1;
                Ok(book)
            });

        let mut patch = draft();
        patch.title = "New Title".to_string();
        let updated = service(store)
            .edit_book_details(ISBN, patch, "bjorn")
            .await
            .unwrap();
        assert_eq!(updated.version, 4);
        assert_eq!(updated.created_by.as_deref(), Some("isabelle"));
        assert_eq!(updated.last_modified_by.as_deref(), Some("bjorn"));
    }

    #[tokio::test]
    async fn edit_of_missing_book_degrades_to_create() {
        let mut store = MockBookStore::new();
        store
            .expect_find_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(None));
        store
            .expect_exists_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(false));
        store
            .expect_save()
            .withf(|book| book.id.is_none() && book.version == 0)
            .returning(|book| Ok(book));

        let created = service(store)
            .edit_book_details(ISBN, draft(), "isabelle")
            .await
            .unwrap();
        assert_eq!(created.isbn, ISBN);
        assert_eq!(created.version, 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let mut store = MockBookStore::new();
        store
            .expect_delete_by_isbn()
            .with(eq(ISBN))
            .times(2)
            .returning(|_| Ok(()));

        let svc = service(store);
        svc.remove_book_from_catalog(ISBN).await.unwrap();
        svc.remove_book_from_catalog(ISBN).await.unwrap();
    }

    #[tokio::test]
    async fn concurrency_conflict_is_surfaced_not_retried() {
        let mut store = MockBookStore::new();
        store
            .expect_find_by_isbn()
            .with(eq(ISBN))
            .returning(|_| Ok(Some(stored_book())));
        store.expect_save().times(1).returning(|book| {
            Err(AppError::ConcurrencyConflict { isbn: book.isbn })
        });

        let err = service(store)
            .edit_book_details(ISBN, draft(), "isabelle")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConcurrencyConflict { .. }));
    }

    #[tokio::test]
    async fn empty_catalog_lists_as_empty_vec() {
        let mut store = MockBookStore::new();
        store.expect_find_all().returning(|| Ok(Vec::new()));

        let books = service(store).view_book_list().await.unwrap();
        assert!(books.is_empty());
    }
}
