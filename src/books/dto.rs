use serde::{Deserialize, Serialize};
use crate::books::domain::model::Book;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookDto {
    pub fn new(title: &str, author: &str, isbn: &str) -> BookDto {
        BookDto {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

impl From<&Book> for BookDto {
    fn from(other: &Book) -> Self {
        BookDto::new(other.title(), other.author(), other.isbn())
    }
}

impl From<&BookDto> for Book {
    fn from(other: &BookDto) -> Self {
        Book::new(other.title.as_str(), other.author.as_str(), other.isbn.as_str())
    }
}
