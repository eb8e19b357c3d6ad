use std::fmt;
use std::fmt::{Display, Formatter};
use serde_json::{Map, Value};
use crate::core::library::{LibraryError, LibraryResult};

pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const ISBN: &str = "isbn";

// Book is a single catalog entry. Fields are kept verbatim and never change after
// construction; the ISBN acts as the identifier within a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
}

impl Book {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn to_structure(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(TITLE.to_string(), Value::String(self.title.clone()));
        map.insert(AUTHOR.to_string(), Value::String(self.author.clone()));
        map.insert(ISBN.to_string(), Value::String(self.isbn.clone()));
        map
    }

    /// Builds a book from a stored or fetched key-value structure.
    ///
    /// All three keys must be present; the first absent one is reported as
    /// `LibraryError::MissingField`. A present key holding a non-string value
    /// is a `LibraryError::Parse`.
    pub fn from_structure(map: &Map<String, Value>) -> LibraryResult<Self> {
        Ok(Self {
            title: string_field(map, TITLE)?,
            author: string_field(map, AUTHOR)?,
            isbn: string_field(map, ISBN)?,
        })
    }
}

fn string_field(map: &Map<String, Value>, field: &str) -> LibraryResult<String> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.to_string()),
        Some(other) => Err(LibraryError::parse(
            format!("field `{}` must be a string, found {}", field, other).as_str())),
        None => Err(LibraryError::missing_field(field)),
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} (ISBN: {})", self.title, self.author, self.isbn)
    }
}

impl TryFrom<&Value> for Book {
    type Error = LibraryError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Book::from_structure(map),
            other => Err(LibraryError::parse(
                format!("book record must be an object, found {}", other).as_str())),
        }
    }
}
