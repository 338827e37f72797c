use tokio_postgres::error::SqlState;
use tokio_postgres::{Row, Statement};

use crate::api::{Book, BookPatch, Isbn, NewBook};
use crate::books_repository::set_clause::SetClause;
use crate::books_repository::{BookRepository, BookRepositoryError};
use crate::connection::PostgresConnectionProvider;

const BOOKS_TABLE: &str = "books";

/// Books stored in the `books` table. Every call opens its own connection
/// and releases it before returning.
pub struct PostgresBooksRepository {
    connection_provider: PostgresConnectionProvider,
}

impl PostgresBooksRepository {
    pub fn new(connection_provider: PostgresConnectionProvider) -> Self {
        Self {
            connection_provider,
        }
    }
}

fn book_from_row(row: &Row) -> Result<Book, tokio_postgres::Error> {
    Ok(Book {
        isbn: row.try_get("isbn")?,
        title: row.try_get("title")?,
        author_first: row.try_get("author_first")?,
        author_last: row.try_get("author_last")?,
        inventory: row.try_get("inventory")?,
    })
}

fn insert_error(isbn: Option<Isbn>, err: tokio_postgres::Error) -> BookRepositoryError {
    match (err.code(), isbn) {
        (Some(code), Some(isbn)) if *code == SqlState::UNIQUE_VIOLATION => {
            BookRepositoryError::AlreadyExists(isbn)
        }
        (Some(code), _) if *code == SqlState::NOT_NULL_VIOLATION => {
            let column = err
                .as_db_error()
                .and_then(|db_err| db_err.column())
                .unwrap_or("unknown")
                .to_string();
            BookRepositoryError::MissingColumn(column)
        }
        _ => err.into(),
    }
}

#[async_trait::async_trait]
impl BookRepository for PostgresBooksRepository {
    async fn add_book(&self, book: NewBook) -> Result<Isbn, BookRepositoryError> {
        let connection = self.connection_provider.connect().await?;
        let stmt: Statement = connection
            .prepare(
                "INSERT INTO books (isbn, title, author_first, author_last, inventory) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING isbn",
            )
            .await?;

        let rows = connection
            .query(
                &stmt,
                &[
                    &book.isbn,
                    &book.title,
                    &book.author_first,
                    &book.author_last,
                    &book.inventory,
                ],
            )
            .await
            .map_err(|err| insert_error(book.isbn, err))?;

        let isbn: Isbn = rows
            .first()
            .ok_or_else(|| BookRepositoryError::Other("Isbn not returned".to_string()))?
            .try_get(0)?;

        tracing::info!("Added book {}", isbn);
        Ok(isbn)
    }

    async fn update_book(&self, isbn: Isbn, patch: BookPatch) -> Result<bool, BookRepositoryError> {
        let connection = self.connection_provider.connect().await?;
        let set_clause = SetClause::from_patch(&patch);

        let rows = if set_clause.is_empty() {
            // Nothing to write, only report whether the book exists
            let stmt: Statement = connection
                .prepare("SELECT isbn FROM books WHERE isbn = $1")
                .await?;
            connection.query(&stmt, &[&isbn]).await?
        } else {
            let stmt: Statement = connection
                .prepare(&set_clause.update_statement(BOOKS_TABLE))
                .await?;
            connection.query(&stmt, &set_clause.params(&isbn)).await?
        };

        tracing::debug!("Update of book {} matched {} rows", isbn, rows.len());
        Ok(!rows.is_empty())
    }

    async fn get_book(&self, isbn: Isbn) -> Result<Book, BookRepositoryError> {
        let connection = self.connection_provider.connect().await?;
        let stmt: Statement = connection
            .prepare(
                "SELECT isbn, title, author_first, author_last, inventory FROM books WHERE isbn = $1",
            )
            .await?;

        let rows = connection.query(&stmt, &[&isbn]).await?;
        let row = rows
            .first()
            .ok_or(BookRepositoryError::NotFound(isbn))?;

        Ok(book_from_row(row)?)
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let connection = self.connection_provider.connect().await?;
        let stmt: Statement = connection
            .prepare("SELECT isbn, title, author_first, author_last, inventory FROM books")
            .await?;

        let rows = connection.query(&stmt, &[]).await?;

        rows.iter()
            .map(|row| Ok(book_from_row(row)?))
            .collect()
    }

    async fn delete_book(&self, isbn: Isbn) -> Result<bool, BookRepositoryError> {
        let connection = self.connection_provider.connect().await?;
        let stmt: Statement = connection
            .prepare("DELETE FROM books WHERE isbn = $1 RETURNING isbn")
            .await?;

        let rows = connection.query(&stmt, &[&isbn]).await?;
        if !rows.is_empty() {
            tracing::info!("Deleted book {}", isbn);
        }
        Ok(!rows.is_empty())
    }
}
