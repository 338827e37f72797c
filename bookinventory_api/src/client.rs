use anyhow::{bail, Context};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{
    AddBookRequest, AddBookResponse, Book, BookPatch, BookSummary, ErrorResponse, Isbn,
};

pub struct BookInventoryClient {
    url: String,
    client: ClientWithMiddleware,
}

/// Reads the `{"error": ...}` body of a failed response, if there is one
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => format!("{} {}", status, body.error),
        Err(_) => status.to_string(),
    }
}

impl BookInventoryClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls GET / endpoint
    pub async fn welcome(&self) -> anyhow::Result<String> {
        let response = self.client.get(format!("{}/", self.url)).send().await?;
        if !response.status().is_success() {
            bail!("Failed to get welcome message {}", error_message(response).await)
        }
        Ok(response.text().await?)
    }

    /// Calls POST /books/add endpoint
    /// Returns isbn reported back by the service
    pub async fn add_book(&self, request: &AddBookRequest) -> anyhow::Result<Isbn> {
        let response = self
            .client
            .post(format!("{}/books/add", self.url))
            .json(request)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            bail!("Failed to add book {}", error_message(response).await)
        }

        let body: AddBookResponse = response.json().await.context("Invalid add book response")?;
        Ok(body.isbn)
    }

    /// Calls GET /books/{isbn} endpoint
    /// Returns None if the book was not found
    pub async fn get_book(&self, isbn: Isbn) -> anyhow::Result<Option<BookSummary>> {
        let response = self
            .client
            .get(format!("{}/books/{}", self.url, isbn))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to get book {}", error_message(response).await)
        }
    }

    /// Calls GET /books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self
            .client
            .get(format!("{}/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to list books {}", error_message(response).await)
        }
    }

    /// Calls PUT /books/update/{isbn} endpoint
    /// Returns false if the book was not found
    pub async fn update_book(&self, isbn: Isbn, patch: &BookPatch) -> anyhow::Result<bool> {
        let response = self
            .client
            .put(format!("{}/books/update/{}", self.url, isbn))
            .json(patch)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else if response.status().is_success() {
            Ok(true)
        } else {
            bail!("Failed to update book {}", error_message(response).await)
        }
    }

    /// Calls DELETE /books/delete/{isbn} endpoint
    /// Returns false if the book was not found
    pub async fn delete_book(&self, isbn: Isbn) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/books/delete/{}", self.url, isbn))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else if response.status().is_success() {
            Ok(true)
        } else {
            bail!("Failed to delete book {}", error_message(response).await)
        }
    }
}
