use serde::{Deserialize, Serialize};

/// A book record. `isbn` is the natural key and never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub isbn: String,
    /// Amazon product URL
    pub amazon_url: String,
    /// Author of the book
    pub author: String,
    /// Language the book is written in
    pub language: String,
    /// Page count
    pub pages: i32,
    /// Publisher name
    pub publisher: String,
    /// Title of the book
    pub title: String,
    /// Publication year
    pub year: i32,
}

/// Response envelope for a single record.
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// Response envelope for the full collection.
#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

/// Response envelope for delete confirmations.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: String,
}
