use std::sync::Arc;

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{Error, HttpResponse, ResponseError};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    AddBookRequest, AddBookResponse, BookPatch, BookSummary, ErrorResponse, Isbn, MessageResponse,
    NewBook,
};
use crate::books_repository::{BookRepository, BookRepositoryError};

pub const WELCOME_MESSAGE: &str = "Welcome to the INFT3200 API";

/// Client errors answered with a JSON body `{"error": <message>}`
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("No input data provided")]
    NoInputData,

    #[error("Missing data")]
    MissingData,

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error("Book not found")]
    BookNotFound,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BookNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// An empty object or a body that is not an object counts as no input at all
fn read_payload<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    match body {
        Value::Object(fields) if !fields.is_empty() => {
            serde_json::from_value(Value::Object(fields)).map_err(|err| {
                tracing::debug!("Rejected request payload {}", err);
                ApiError::NoInputData
            })
        }
        _ => Err(ApiError::NoInputData),
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.is_empty())
}

fn is_nonzero(value: &Option<i32>) -> bool {
    value.is_some_and(|value| value != 0)
}

/// Every field of a new book must be set and non-empty. A zero inventory counts as missing.
fn validate_new_book(request: AddBookRequest) -> Result<NewBook, ApiError> {
    match request {
        AddBookRequest {
            isbn,
            title: Some(title),
            author_first: Some(author_first),
            author_last: Some(author_last),
            inventory: Some(inventory),
        } if !title.is_empty()
            && !author_first.is_empty()
            && !author_last.is_empty()
            && inventory != 0 =>
        {
            Ok(NewBook {
                isbn,
                title,
                author_first,
                author_last,
                inventory,
            })
        }
        _ => Err(ApiError::MissingData),
    }
}

/// A patch is rejected unless at least one of its fields is set to a non-empty, non-zero value
fn validate_patch(patch: &BookPatch) -> Result<(), ApiError> {
    if is_set(&patch.title)
        || is_set(&patch.author_first)
        || is_set(&patch.author_last)
        || is_nonzero(&patch.inventory)
    {
        Ok(())
    } else {
        Err(ApiError::NothingToUpdate)
    }
}

#[api_v2_operation]
pub async fn welcome() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(WELCOME_MESSAGE))
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    let books = books_repository.list_books().await?;
    Ok(HttpResponse::Ok().json(books))
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<Isbn>,
) -> Result<HttpResponse, Error> {
    match books_repository.get_book(isbn.into_inner()).await {
        Ok(book) => Ok(HttpResponse::Ok().json(BookSummary::from(book))),
        Err(BookRepositoryError::NotFound(_)) => Err(ApiError::BookNotFound.into()),
        Err(err) => Err(err.into()),
    }
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    body: web::Json<Value>,
) -> Result<HttpResponse, Error> {
    let request: AddBookRequest = read_payload(body.into_inner())?;
    let new_book = validate_new_book(request)?;
    let isbn = books_repository.add_book(new_book).await?;

    Ok(HttpResponse::Created()
        .append_header((LOCATION, format!("/books/{}", isbn)))
        .json(AddBookResponse {
            message: "New book added".to_string(),
            isbn,
        }))
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<Isbn>,
    body: web::Json<Value>,
) -> Result<HttpResponse, Error> {
    let patch: BookPatch = read_payload(body.into_inner())?;
    validate_patch(&patch)?;

    if books_repository
        .update_book(isbn.into_inner(), patch)
        .await?
    {
        Ok(HttpResponse::Ok().json(MessageResponse::new("Book updated successfully")))
    } else {
        Err(ApiError::BookNotFound.into())
    }
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<Isbn>,
) -> Result<HttpResponse, Error> {
    if books_repository.delete_book(isbn.into_inner()).await? {
        Ok(HttpResponse::Ok().json(MessageResponse::new("Book deleted successfully")))
    } else {
        Err(ApiError::BookNotFound.into())
    }
}
