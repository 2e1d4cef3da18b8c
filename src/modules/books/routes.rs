//! Request handlers for the books resource.
//!
//! Each handler is a one-shot pipeline: parse the body (where there is
//! one), validate it against the book contract, then run a single store
//! operation. Invalid payloads never reach the store.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use bookstore_http::error::AppError;

use super::models::{Book, BookEnvelope, BooksEnvelope, MessageEnvelope};
use super::schema::validate_book_payload;
use super::store::BookStore;

type Store = State<Arc<dyn BookStore>>;

/// GET / returns the full collection in storage order.
pub async fn list_books(State(store): Store) -> Result<Json<BooksEnvelope>, AppError> {
    let books = store.list().await?;
    Ok(Json(BooksEnvelope { books }))
}

/// GET /{isbn}
pub async fn get_book(
    State(store): Store,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = store.get(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

/// POST /
pub async fn create_book(
    State(store): Store,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let book = parse_book(payload)?;
    let book = store.create(&book).await?;
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

/// PUT /{isbn} does a full replace of the non-key fields. The body's isbn,
/// if different from the path key, does not rename the record.
pub async fn update_book(
    State(store): Store,
    Path(isbn): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = parse_book(payload)?;
    let book = store.update(&isbn, &book).await?;
    Ok(Json(BookEnvelope { book }))
}

/// DELETE /{isbn}
pub async fn delete_book(
    State(store): Store,
    Path(isbn): Path<String>,
) -> Result<Json<MessageEnvelope>, AppError> {
    store.delete(&isbn).await?;
    Ok(Json(MessageEnvelope {
        message: "Book deleted".to_string(),
    }))
}

/// Validate a candidate payload and deserialize it into a record.
fn parse_book(payload: Value) -> Result<Book, AppError> {
    validate_book_payload(&payload)?;

    // The schema guarantees presence and primitive types, so this only
    // fails on out-of-range integers.
    serde_json::from_value(payload).map_err(|error| {
        AppError::validation(
            vec![json!({"field": "", "error": error.to_string()})],
            "book payload failed deserialization",
        )
    })
}
