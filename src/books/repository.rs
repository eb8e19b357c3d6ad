pub mod json_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::core::library::LibraryResult;

#[async_trait]
pub trait BookRepository: Sync + Send {
    // loads every stored book in order, None when nothing has been stored yet
    async fn load(&self) -> LibraryResult<Option<Vec<Book>>>;

    // replaces the stored set with the given books
    async fn save(&self, books: &[Book]) -> LibraryResult<()>;

    // describes where the books are kept, used in log lines
    fn location(&self) -> String;
}
