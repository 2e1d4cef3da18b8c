//! Persistence seam for book records.
//!
//! Handlers receive the store as `Arc<dyn BookStore>` so the Postgres
//! implementation can be swapped for the in-memory one in tests.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use bookstore_http::error::AppError;

use super::models::Book;

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

mod memory;
mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("there is no book with an isbn '{0}'")]
    NotFound(String),

    #[error("a book with isbn '{0}' already exists")]
    Duplicate(String),

    #[error("store backend failure")]
    Backend(#[from] sqlx::Error),
}

/// Record store contract for the `books` table. Every operation is a
/// single statement; the store's own atomicity is the only concurrency
/// guarantee relied upon.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new record. Fails with `Duplicate` if the isbn is taken.
    async fn create(&self, book: &Book) -> Result<Book, StoreError>;

    /// All records in storage order.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// The record named by `isbn`, or `NotFound`.
    async fn get(&self, isbn: &str) -> Result<Book, StoreError>;

    /// Full replace of the non-key fields of the record named by `isbn`.
    /// The payload's own isbn is ignored; renames are not supported.
    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError>;

    /// Remove the record named by `isbn`, or fail with `NotFound`.
    async fn delete(&self, isbn: &str) -> Result<(), StoreError>;
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(isbn) => {
                AppError::not_found(format!("There is no book with an isbn '{isbn}'"))
            }
            StoreError::Duplicate(isbn) => AppError::conflict(
                vec![json!({"field": "isbn", "error": "already exists"})],
                format!("A book with isbn '{isbn}' already exists"),
            ),
            StoreError::Backend(error) => AppError::Internal(error.into()),
        }
    }
}
