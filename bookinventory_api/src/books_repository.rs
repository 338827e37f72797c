pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::PostgresBooksRepository;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::api::{Book, BookPatch, Isbn, NewBook};

mod in_memory_books_repository;
mod postgres_books_repository;
mod set_clause;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} not found")]
    NotFound(Isbn),

    #[error("Book {0} already exists")]
    AlreadyExists(Isbn),

    #[error("Missing value for column {0}")]
    MissingColumn(String),

    #[error("Database connection is not configured, {0} is not set")]
    ConnectionNotConfigured(&'static str),

    #[error("Failed to connect to database: {0}")]
    ConnectionFailure(#[source] tokio_postgres::Error),

    #[error("Failed to deserialize book: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Database failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

/// Store failures are not part of the API contract, they surface as a bare 500
impl ResponseError for BookRepositoryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Book store failure {}", self);
        HttpResponse::InternalServerError().finish()
    }
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts a book, returns the isbn reported back by the store
    async fn add_book(&self, book: NewBook) -> Result<Isbn, BookRepositoryError>;
    /// Writes the fields set in the patch, returns true if the book was found and false otherwise
    async fn update_book(&self, isbn: Isbn, patch: BookPatch) -> Result<bool, BookRepositoryError>;
    /// Retrieves the book, fails with NotFound if there is no such isbn
    async fn get_book(&self, isbn: Isbn) -> Result<Book, BookRepositoryError>;
    /// Lists all books in no particular order
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Removes the book, returns true if it existed
    async fn delete_book(&self, isbn: Isbn) -> Result<bool, BookRepositoryError>;
}
