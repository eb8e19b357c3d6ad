pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::core::library::LibraryResult;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

// LoadOutcome reports what happened when the catalog read its storage. None of
// these abort the catalog: anything but Loaded leaves it with an empty collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    NoExistingData,
    ParseError { message: String },
    Unreadable { message: String },
}

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn load(&self) -> LoadOutcome;
    // persists the current collection, returns false when the write failed
    async fn save(&self) -> bool;
    async fn find_book_by_isbn(&self, isbn: &str) -> Option<Book>;
    async fn add_book(&self, book: &Book) -> LibraryResult<Book>;
    async fn add_book_by_isbn(&self, isbn: &str) -> LibraryResult<Book>;
    async fn remove_book(&self, isbn: &str) -> LibraryResult<Book>;
    async fn list_books(&self) -> Vec<Book>;
}
