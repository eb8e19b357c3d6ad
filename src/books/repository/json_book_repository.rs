use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::books::domain::model::Book;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};

// JsonBookRepository keeps the whole collection as a pretty-printed JSON array of
// {title, author, isbn} objects in a single file. Every save rewrites the file.
#[derive(Debug)]
pub struct JsonBookRepository {
    path: PathBuf,
}

impl JsonBookRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_books(data: &[u8]) -> LibraryResult<Vec<Book>> {
    let records: Vec<Value> = serde_json::from_slice(data)?;
    records.iter().map(Book::try_from).collect()
}

#[async_trait]
impl BookRepository for JsonBookRepository {
    async fn load(&self) -> LibraryResult<Option<Vec<Book>>> {
        // raw bytes, so content that is not UTF-8 is reported as a parse failure
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(LibraryError::persistence(
                    format!("read {}: {}", self.path.display(), err).as_str()));
            }
        };
        parse_books(&data)
            .map(Some)
            .map_err(|err| LibraryError::parse(format!("parse {}: {}", self.path.display(), err).as_str()))
    }

    async fn save(&self, books: &[Book]) -> LibraryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| LibraryError::persistence(
                format!("create dir {}: {}", parent.display(), err).as_str()))?;
        }
        let records: Vec<Value> = books.iter().map(|b| Value::Object(b.to_structure())).collect();
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json).await.map_err(|err| LibraryError::persistence(
            format!("write {}: {}", self.path.display(), err).as_str()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
