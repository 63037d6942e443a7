//! Repository trait definitions
//!
//! These traits define the contract for catalog data access, one per record
//! kind. Implementations live in the infrastructure layer.
//!
//! Lookups by a malformed or unknown identity return `Ok(None)`, never an
//! error. References between records are not checked by the store.

use async_trait::async_trait;

use super::DomainError;
use super::catalog::{
    Author, Book, BookDetail, BookInstance, BookInstanceDetail, BookListing, BookStatus,
    BookSummary, Genre,
};

/// Repository trait for Author records
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors sorted by family name
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Author>, DomainError>;

    /// Insert a new author, keeping the identity it was constructed with
    async fn create(&self, author: Author) -> Result<Author, DomainError>;

    /// Overwrite the author stored under `id`; `None` when it no longer exists
    async fn update(&self, id: &str, author: Author) -> Result<Option<Author>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for Genre records
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres sorted by name
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Genre>, DomainError>;

    /// Case-insensitive lookup by name, used for duplicate detection
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError>;

    async fn create(&self, genre: Genre) -> Result<Genre, DomainError>;

    async fn update(&self, id: &str, genre: Genre) -> Result<Option<Genre>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for Book records
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books sorted by title, with their author resolved
    async fn find_all(&self) -> Result<Vec<BookListing>, DomainError>;

    /// Title/summary projection of every book sorted by title
    async fn find_summaries(&self) -> Result<Vec<BookSummary>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError>;

    /// A book with its author and genres resolved
    async fn find_detail(&self, id: &str) -> Result<Option<BookDetail>, DomainError>;

    async fn find_by_author(&self, author_id: &str) -> Result<Vec<BookSummary>, DomainError>;

    async fn find_by_genre(&self, genre_id: &str) -> Result<Vec<BookSummary>, DomainError>;

    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    async fn update(&self, id: &str, book: Book) -> Result<Option<Book>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository trait for BookInstance records (physical copies)
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// All copies with their book resolved, sorted by imprint
    async fn find_all(&self) -> Result<Vec<BookInstanceDetail>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BookInstance>, DomainError>;

    /// A copy with its book resolved
    async fn find_detail(&self, id: &str) -> Result<Option<BookInstanceDetail>, DomainError>;

    async fn find_by_book(&self, book_id: &str) -> Result<Vec<BookInstance>, DomainError>;

    async fn create(&self, instance: BookInstance) -> Result<BookInstance, DomainError>;

    async fn update(
        &self,
        id: &str,
        instance: BookInstance,
    ) -> Result<Option<BookInstance>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Count copies, optionally only those with the given status
    async fn count(&self, status: Option<BookStatus>) -> Result<u64, DomainError>;
}
