pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookstore_kernel::{InitCtx, Migration, Module};

use store::BookStore;

/// Books module: validation-and-persistence pipeline for book records
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(routes::list_books).post(routes::create_book))
            .route(
                "/{isbn}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All book records",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": {
                                                        "$ref": "#/components/schemas/Book"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/Book"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Payload failed schema validation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "409": {
                                "description": "A book with this isbn already exists",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Fetch a book by isbn",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The book record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/Book"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookEnvelope"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Payload failed schema validation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "message": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": "string",
                                "description": "Unique identifier for the book"
                            },
                            "amazon_url": {
                                "type": "string",
                                "description": "Amazon product URL"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "language": {
                                "type": "string",
                                "description": "Language the book is written in"
                            },
                            "pages": {
                                "type": "integer",
                                "description": "Page count"
                            },
                            "publisher": {
                                "type": "string",
                                "description": "Publisher name"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "year": {
                                "type": "integer",
                                "description": "Publication year"
                            }
                        },
                        "required": ["isbn", "amazon_url", "author", "language", "pages", "publisher", "title", "year"]
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": {
                            "book": {
                                "$ref": "#/components/schemas/Book"
                            }
                        },
                        "required": ["book"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    isbn TEXT PRIMARY KEY,
                    amazon_url TEXT NOT NULL,
                    author TEXT NOT NULL,
                    language TEXT NOT NULL,
                    pages INTEGER NOT NULL,
                    publisher TEXT NOT NULL,
                    title TEXT NOT NULL,
                    year INTEGER NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module backed by the given store
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
