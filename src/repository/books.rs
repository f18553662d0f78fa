//! Books repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::BookStore,
};

const BOOK_COLUMNS: &str = "id, isbn, title, author, price, publisher, version, \
                            created_at, last_modified_at, created_by, last_modified_by";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, book: Book) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (isbn, title, author, price, publisher, version,
                               created_at, last_modified_at, created_by, last_modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOK_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.isbn)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price)
            .bind(&book.publisher)
            .bind(book.version)
            .bind(book.created_at)
            .bind(book.last_modified_at)
            .bind(&book.created_by)
            .bind(&book.last_modified_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                // Concurrent insert racing past the service's existence check
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                    AppError::BookAlreadyExists {
                        isbn: book.isbn.clone(),
                    }
                }
                _ => AppError::Database(e),
            })
    }

    async fn update(&self, book: Book, id: i64) -> AppResult<Book> {
        let isbn = book.isbn.clone();
        let query = format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, price = $3, publisher = $4,
                last_modified_at = $5, last_modified_by = $6,
                version = version + 1
            WHERE id = $7 AND version = $8
            RETURNING {BOOK_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price)
            .bind(&book.publisher)
            .bind(book.last_modified_at)
            .bind(&book.last_modified_by)
            .bind(id)
            .bind(book.version)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ConcurrencyConflict { isbn })
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books");
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = $1");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        match book.id {
            Some(id) => self.update(book, id).await,
            None => self.insert(book).await,
        }
    }

    async fn delete_by_isbn(&self, isbn: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
