use async_trait::async_trait;
use serde::Deserialize;
use crate::core::library::LibraryResult;

// Edition is the part of a book-by-ISBN lookup the catalog cares about
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Edition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<AuthorRef>>,
}

impl Edition {
    #[cfg(test)]
    pub fn new(title: Option<&str>, author_keys: &[&str]) -> Self {
        Self {
            title: title.map(str::to_string),
            authors: Some(author_keys.iter().map(|k| AuthorRef { key: Some(k.to_string()) }).collect()),
        }
    }

    pub fn author_keys(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().flatten().filter_map(|a| a.key.as_deref())
    }
}

// AuthorRef points at an author resource, e.g. `/authors/OL34184A`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
}

/// MetadataLookup fetches book metadata from an external service.
///
/// Implementations report a missing edition as `LibraryError::NotFound` and
/// every other failure (transport, timeout, unexpected status, unreadable
/// body) as `LibraryError::LookupFailed`.
#[async_trait]
pub trait MetadataLookup: Sync + Send {
    async fn find_edition(&self, isbn: &str) -> LibraryResult<Edition>;

    async fn find_author(&self, author_key: &str) -> LibraryResult<Author>;
}
