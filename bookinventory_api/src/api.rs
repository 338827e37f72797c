use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type Isbn = i32;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A full row of the books table, as returned by the list endpoint
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
    pub author_first: String,
    pub author_last: String,
    pub inventory: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Book returned by the single book lookup. Does not carry the inventory count.
pub struct BookSummary {
    pub isbn: Isbn,
    pub title: String,
    pub author_first: String,
    pub author_last: String,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            isbn: book.isbn,
            title: book.title,
            author_first: book.author_first,
            author_last: book.author_last,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Payload of the create endpoint. Author names use camel case on this endpoint only.
pub struct AddBookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Isbn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        rename = "authorFirstName",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_first: Option<String>,
    #[serde(rename = "authorLastName", skip_serializing_if = "Option::is_none")]
    pub author_last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i32>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// Validated book ready to be inserted. The isbn is not checked by the create endpoint,
/// so it can still be missing here and is rejected by the store.
pub struct NewBook {
    pub isbn: Option<Isbn>,
    pub title: String,
    pub author_first: String,
    pub author_last: String,
    pub inventory: i32,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Struct representing a patch to a book. Only the fields that are set are written.
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i32>,
}

impl BookPatch {
    /// True when no field is set at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author_first.is_none()
            && self.author_last.is_none()
            && self.inventory.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct AddBookResponse {
    pub message: String,
    pub isbn: Isbn,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}
