use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookStore, StoreError};
use crate::modules::books::models::Book;

/// Insertion-ordered in-memory store, the test double enabled by the
/// `BookStore` seam.
#[derive(Default)]
pub struct MemoryBookStore {
    records: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.isbn == book.isbn) {
            return Err(StoreError::Duplicate(book.isbn.clone()));
        }
        records.push(book.clone());
        Ok(book.clone())
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, isbn: &str) -> Result<Book, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|existing| existing.isbn == isbn)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        let mut records = self.records.write().await;
        let existing = records
            .iter_mut()
            .find(|existing| existing.isbn == isbn)
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))?;

        // The path key names the row; the payload's isbn is ignored.
        let updated = Book {
            isbn: existing.isbn.clone(),
            ..book.clone()
        };
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, isbn: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|existing| existing.isbn != isbn);
        if records.len() == before {
            return Err(StoreError::NotFound(isbn.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: "http://a.co/eobPtX2".to_string(),
            author: "Test author".to_string(),
            language: "english".to_string(),
            pages: 10,
            publisher: "Test Publishing".to_string(),
            title: title.to_string(),
            year: 2023,
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_equal_record() {
        let store = MemoryBookStore::new();
        let record = book("1111", "Test Title");

        store.create(&record).await.unwrap();
        let found = store.get("1111").await.unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn duplicate_create_fails_and_keeps_prior_record() {
        let store = MemoryBookStore::new();
        let original = book("1111", "Test Title");
        store.create(&original).await.unwrap();

        let duplicate = book("1111", "Impostor");
        let err = store.create(&duplicate).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(isbn) if isbn == "1111"));

        // Prior record is unchanged.
        assert_eq!(store.get("1111").await.unwrap(), original);
    }

    #[tokio::test]
    async fn update_replaces_every_field_except_the_key() {
        let store = MemoryBookStore::new();
        store.create(&book("1111", "Test Title")).await.unwrap();

        let mut replacement = book("9999", "New Title");
        replacement.pages = 400;
        let updated = store.update("1111", &replacement).await.unwrap();

        assert_eq!(updated.isbn, "1111");
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.pages, 400);
        assert_eq!(store.get("1111").await.unwrap(), updated);
        // No rename happened.
        assert!(store.get("9999").await.is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_with_not_found() {
        let store = MemoryBookStore::new();

        assert!(matches!(
            store.get("gucci").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.update("gucci", &book("gucci", "x")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.delete("gucci").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryBookStore::new();
        store.create(&book("1111", "Test Title")).await.unwrap();

        store.delete("1111").await.unwrap();
        assert!(matches!(
            store.get("1111").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryBookStore::new();
        store.create(&book("1111", "First")).await.unwrap();
        store.create(&book("2222", "Second")).await.unwrap();
        store.create(&book("3333", "Third")).await.unwrap();

        let isbns: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.isbn)
            .collect();
        assert_eq!(isbns, vec!["1111", "2222", "3333"]);
    }
}
