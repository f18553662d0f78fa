//! Repository layer for database operations

pub mod books;

pub use books::PgBookStore;

use async_trait::async_trait;

use crate::{error::AppResult, models::Book};

/// Persistence contract for the book aggregate, keyed by ISBN.
///
/// `save` inserts when the surrogate id is unset and otherwise performs a
/// version-checked update, failing with `ConcurrencyConflict` when the passed
/// version is stale. `delete_by_isbn` is idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    async fn save(&self, book: Book) -> AppResult<Book>;

    async fn delete_by_isbn(&self, isbn: &str) -> AppResult<()>;
}
