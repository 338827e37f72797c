use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::json;

use crate::api::{Book, BookPatch, Isbn, NewBook};
use crate::books_repository::{BookRepository, BookRepositoryError};

/// Books kept in process memory, used for local development and handler tests
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: parking_lot::RwLock<HashMap<Isbn, Book>>,
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(&self, book: NewBook) -> Result<Isbn, BookRepositoryError> {
        let isbn = book
            .isbn
            .ok_or_else(|| BookRepositoryError::MissingColumn("isbn".to_string()))?;

        match self.books.write().entry(isbn) {
            Entry::Occupied(_) => Err(BookRepositoryError::AlreadyExists(isbn)),
            Entry::Vacant(entry) => {
                entry.insert(Book {
                    isbn,
                    title: book.title,
                    author_first: book.author_first,
                    author_last: book.author_last,
                    inventory: book.inventory,
                });
                Ok(isbn)
            }
        }
    }

    async fn update_book(&self, isbn: Isbn, patch: BookPatch) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if let Some(book) = locked_books.get_mut(&isbn) {
            let mut result_book = json!(book);
            json_patch::merge(&mut result_book, &json!(patch));
            let result_book: Book = serde_json::from_value(result_book)?;
            *book = result_book;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn get_book(&self, isbn: Isbn) -> Result<Book, BookRepositoryError> {
        self.books
            .read()
            .get(&isbn)
            .cloned()
            .ok_or(BookRepositoryError::NotFound(isbn))
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.books.read().values().cloned().collect())
    }

    async fn delete_book(&self, isbn: Isbn) -> Result<bool, BookRepositoryError> {
        Ok(self.books.write().remove(&isbn).is_some())
    }
}

#[cfg(test)]
mod in_memory_book_repository_tests {
    use crate::api::{Book, BookPatch, NewBook};
    use crate::books_repository::{BookRepository, BookRepositoryError, InMemoryBookRepository};

    fn new_book(isbn: i32, title: &str) -> NewBook {
        NewBook {
            isbn: Some(isbn),
            title: title.to_string(),
            author_first: "Octavia".to_string(),
            author_last: "Butler".to_string(),
            inventory: 2,
        }
    }

    #[tokio::test]
    /// Tests if add_book and get_book work correctly
    async fn test_add_book_and_get_it() {
        let repo = InMemoryBookRepository::default();

        let book_not_found = repo.get_book(20000).await;
        assert!(matches!(
            book_not_found,
            Err(BookRepositoryError::NotFound(20000))
        ));

        let isbn = repo
            .add_book(new_book(31, "Kindred"))
            .await
            .expect("Failed to add book");
        assert_eq!(isbn, 31);

        let book = repo.get_book(isbn).await.expect("Failed to get book");
        assert_eq!(
            book,
            Book {
                isbn: 31,
                title: "Kindred".to_string(),
                author_first: "Octavia".to_string(),
                author_last: "Butler".to_string(),
                inventory: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_and_missing_isbn() {
        let repo = InMemoryBookRepository::default();
        repo.add_book(new_book(1, "first")).await.unwrap();

        let duplicate = repo.add_book(new_book(1, "second")).await;
        assert!(matches!(
            duplicate,
            Err(BookRepositoryError::AlreadyExists(1))
        ));
        assert_eq!(repo.get_book(1).await.unwrap().title, "first");

        let missing_isbn = repo
            .add_book(NewBook {
                isbn: None,
                ..new_book(0, "no isbn")
            })
            .await;
        assert!(matches!(
            missing_isbn,
            Err(BookRepositoryError::MissingColumn(..))
        ));
        assert_eq!(repo.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    /// Tests if list_books works correctly
    async fn test_add_books_and_list_them() {
        let repo = InMemoryBookRepository::default();

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        repo.add_book(new_book(1, "title1")).await.unwrap();
        repo.add_book(new_book(2, "title2")).await.unwrap();

        let mut list = repo.list_books().await.expect("Failed to list books");
        list.sort_by_key(|book| book.isbn);

        assert_eq!(
            list.iter()
                .map(|book| (book.isbn, book.title.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "title1"), (2, "title2")]
        );
    }

    #[tokio::test]
    /// Tests that a patch writes only the fields it carries
    async fn test_add_book_patch_and_get_it() {
        let repo = InMemoryBookRepository::default();
        let result = repo
            .update_book(2000, BookPatch::default())
            .await
            .expect("Failed to update");
        // false means the book was not found
        assert!(!result);

        let isbn = repo.add_book(new_book(5, "xx")).await.unwrap();
        let original = repo.get_book(isbn).await.unwrap();

        let patch_author_last_only = BookPatch {
            author_last: Some("Estrada Butler".to_string()),
            ..BookPatch::default()
        };
        assert!(repo
            .update_book(isbn, patch_author_last_only)
            .await
            .expect("Failed to patch"));
        assert_eq!(
            repo.get_book(isbn).await.unwrap(),
            Book {
                author_last: "Estrada Butler".to_string(),
                ..original
            }
        );

        let patch_all_fields = BookPatch {
            title: Some("Dawn".to_string()),
            author_first: Some("O. E.".to_string()),
            author_last: Some("B".to_string()),
            inventory: Some(0),
        };
        assert!(repo
            .update_book(isbn, patch_all_fields)
            .await
            .expect("Failed to patch"));
        assert_eq!(
            repo.get_book(isbn).await.unwrap(),
            Book {
                isbn,
                title: "Dawn".to_string(),
                author_first: "O. E.".to_string(),
                author_last: "B".to_string(),
                inventory: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_book() {
        let repo = InMemoryBookRepository::default();
        assert!(!repo.delete_book(9).await.unwrap());

        repo.add_book(new_book(9, "nine")).await.unwrap();
        repo.add_book(new_book(10, "ten")).await.unwrap();

        assert!(repo.delete_book(9).await.unwrap());
        assert!(!repo.delete_book(9).await.unwrap());
        assert!(matches!(
            repo.get_book(9).await,
            Err(BookRepositoryError::NotFound(9))
        ));
        assert_eq!(repo.list_books().await.unwrap().len(), 1);
    }
}
