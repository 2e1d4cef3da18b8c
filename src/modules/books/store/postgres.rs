use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::PgPool;

use super::{BookStore, StoreError};
use crate::modules::books::models::Book;

/// Postgres-backed store over the `books` table. Duplicate creates are
/// rejected by the primary-key constraint, not by application locking.
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    isbn: String,
    amazon_url: String,
    author: String,
    language: String,
    pages: i32,
    publisher: String,
    title: String,
    year: i32,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            isbn: row.isbn,
            amazon_url: row.amazon_url,
            author: row.author,
            language: row.language,
            pages: row.pages,
            publisher: row.publisher,
            title: row.title,
            year: row.year,
        }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match &error {
            sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
                StoreError::Duplicate(book.isbn.clone())
            }
            _ => StoreError::Backend(error),
        })?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get(&self, isbn: &str) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::from)
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        // The path key names the row; the payload's isbn is ignored.
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET amazon_url = $2, author = $3, language = $4, pages = $5,
                publisher = $6, title = $7, year = $8
            WHERE isbn = $1
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::from)
            .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    async fn delete(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(isbn.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::store::MemoryBookStore;
    use crate::modules::books::BooksModule;
    use bookstore_kernel::Module;

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

    // Round-trip against a real Postgres; POSTGRES_URL must point at a
    // disposable database.
    #[test_with::env(POSTGRES_URL)]
    #[tokio::test]
    async fn postgres_round_trip() -> Result<(), StoreError> {
        let url = std::env::var("POSTGRES_URL").unwrap();
        let pool = PgPool::connect(&url).await?;

        let module = BooksModule::new(std::sync::Arc::new(MemoryBookStore::new()));
        for migration in module.migrations() {
            sqlx::raw_sql(migration.up).execute(&pool).await?;
        }
        sqlx::query("DELETE FROM books").execute(&pool).await?;

        let store = PgBookStore::new(pool);
        let record = book("1111", "Test Title");

        let created = store.create(&record).await?;
        assert_eq!(created, record);
        assert_eq!(store.get("1111").await?, record);

        let err = store.create(&book("1111", "Impostor")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let updated = store.update("1111", &book("9999", "New Title")).await?;
        assert_eq!(updated.isbn, "1111");
        assert_eq!(updated.title, "New Title");

        store.delete("1111").await?;
        assert!(matches!(
            store.get("1111").await.unwrap_err(),
            StoreError::NotFound(_)
        ));

        Ok(())
    }
}
