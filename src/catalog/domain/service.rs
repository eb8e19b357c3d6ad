use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::books::domain::model::Book;
use crate::books::repository::BookRepository;
use crate::catalog::domain::{CatalogService, LoadOutcome, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::lookup::{Edition, MetadataLookup};

// CatalogServiceImpl owns the ordered collection of books. Every mutation holds the
// write guard from the duplicate check until the collection has been persisted, so
// concurrent adds of the same ISBN cannot both succeed.
pub struct CatalogServiceImpl {
    books: RwLock<Vec<Book>>,
    book_repository: Box<dyn BookRepository>,
    metadata_lookup: Box<dyn MetadataLookup>,
}

impl CatalogServiceImpl {
    pub async fn new(book_repository: Box<dyn BookRepository>,
                     metadata_lookup: Box<dyn MetadataLookup>) -> Self {
        let svc = Self {
            books: RwLock::new(vec![]),
            book_repository,
            metadata_lookup,
        };
        // load logs its outcome; callers that need it can call load again
        let _ = svc.load().await;
        svc
    }

    async fn persist(&self, books: &[Book]) -> bool {
        match self.book_repository.save(books).await {
            Ok(_) => {
                debug!("saved {} books to {}", books.len(), self.book_repository.location());
                true
            }
            Err(err) => {
                warn!("could not save books to {}: {}", self.book_repository.location(), err);
                false
            }
        }
    }

    async fn fetch_book(&self, isbn: &str) -> LibraryResult<Book> {
        let edition = self.metadata_lookup.find_edition(isbn).await
            .map_err(|err| match err.lookup_or_not_found() {
                LibraryError::NotFound { .. } => LibraryError::not_found(
                    format!("no book found for ISBN {}", isbn).as_str()),
                other => other,
            })?;
        let title = edition.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let author = self.resolve_authors(&edition).await;
        Ok(Book::new(title.as_str(), author.as_str(), isbn))
    }

    // resolve_authors is best effort: an author that cannot be fetched is left out
    async fn resolve_authors(&self, edition: &Edition) -> String {
        let mut names = vec![];
        for key in edition.author_keys() {
            match self.metadata_lookup.find_author(key).await {
                Ok(author) => names.push(author.name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())),
                Err(err) => debug!("skipping author {}: {}", key, err),
            }
        }
        if names.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            names.join(", ")
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn load(&self) -> LoadOutcome {
        let mut books = self.books.write().await;
        let location = self.book_repository.location();
        match self.book_repository.load().await {
            Ok(Some(loaded)) => {
                info!("{} books loaded from {}", loaded.len(), location);
                *books = loaded;
                LoadOutcome::Loaded { count: books.len() }
            }
            Ok(None) => {
                info!("no existing data at {}, starting an empty library", location);
                books.clear();
                LoadOutcome::NoExistingData
            }
            Err(LibraryError::Parse { message }) => {
                warn!("could not parse {}: {}", location, message);
                books.clear();
                LoadOutcome::ParseError { message }
            }
            Err(err) => {
                warn!("could not read {}: {}", location, err);
                books.clear();
                LoadOutcome::Unreadable { message: err.to_string() }
            }
        }
    }

    async fn save(&self) -> bool {
        let books = self.books.read().await;
        self.persist(&books).await
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|b| b.isbn() == isbn).cloned()
    }

    async fn add_book(&self, book: &Book) -> LibraryResult<Book> {
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.isbn() == book.isbn()) {
            info!("book with ISBN {} already exists", book.isbn());
            return Err(LibraryError::duplicate_isbn(book.isbn()));
        }
        books.push(book.clone());
        self.persist(&books).await;
        info!("book added: {}", book);
        Ok(book.clone())
    }

    async fn add_book_by_isbn(&self, isbn: &str) -> LibraryResult<Book> {
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.isbn() == isbn) {
            info!("book with ISBN {} already exists", isbn);
            return Err(LibraryError::duplicate_isbn(isbn));
        }
        info!("looking up ISBN {}", isbn);
        let book = match self.fetch_book(isbn).await {
            Ok(book) => book,
            Err(err) => {
                warn!("lookup for ISBN {} failed: {}", isbn, err);
                return Err(err);
            }
        };
        books.push(book.clone());
        self.persist(&books).await;
        info!("book added: {}", book);
        Ok(book)
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<Book> {
        let mut books = self.books.write().await;
        let pos = books.iter().position(|b| b.isbn() == isbn)
            .ok_or_else(|| LibraryError::not_found(format!("no book with ISBN {}", isbn).as_str()))?;
        let removed = books.remove(pos);
        self.persist(&books).await;
        info!("book removed: {}", removed);
        Ok(removed)
    }

    async fn list_books(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use crate::books::domain::model::Book;
    use crate::books::repository::json_book_repository::JsonBookRepository;
    use crate::catalog::domain::{CatalogService, LoadOutcome};
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::library::{LibraryError, LibraryResult};
    use crate::gateway::lookup::{Author, Edition, MetadataLookup};

    // StubLookup answers from in-memory maps; unknown ISBNs and authors are not found
    #[derive(Default, Clone)]
    pub(crate) struct StubLookup {
        editions: HashMap<String, LibraryResult<Edition>>,
        authors: HashMap<String, LibraryResult<Author>>,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl StubLookup {
        pub(crate) fn with_edition(mut self, isbn: &str, edition: LibraryResult<Edition>) -> Self {
            self.editions.insert(isbn.to_string(), edition);
            self
        }

        pub(crate) fn with_author(mut self, key: &str, name: Option<&str>) -> Self {
            self.authors.insert(key.to_string(), Ok(Author { name: name.map(str::to_string) }));
            self
        }

        pub(crate) fn with_author_error(mut self, key: &str, err: LibraryError) -> Self {
            self.authors.insert(key.to_string(), Err(err));
            self
        }
    }

    #[async_trait]
    impl MetadataLookup for StubLookup {
        async fn find_edition(&self, isbn: &str) -> LibraryResult<Edition> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.editions.get(isbn).cloned()
                .unwrap_or_else(|| Err(LibraryError::not_found(isbn)))
        }

        async fn find_author(&self, author_key: &str) -> LibraryResult<Author> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.authors.get(author_key).cloned()
                .unwrap_or_else(|| Err(LibraryError::not_found(author_key)))
        }
    }

    pub(crate) async fn build_catalog(path: &Path, lookup: StubLookup) -> CatalogServiceImpl {
        CatalogServiceImpl::new(Box::new(JsonBookRepository::new(path)), Box::new(lookup)).await
    }

    pub(crate) async fn build_shared_catalog(path: &Path, lookup: StubLookup) -> Arc<dyn CatalogService> {
        Arc::new(build_catalog(path, lookup).await)
    }

    fn dune() -> Book {
        Book::new("Dune", "Frank Herbert", "978-0441172719")
    }

    #[tokio::test]
    async fn test_should_add_book() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), StubLookup::default()).await;

        let added = catalog_svc.add_book(&dune()).await.expect("should add book");
        assert_eq!(dune(), added);
        assert_eq!(1, catalog_svc.list_books().await.len());
        let loaded = catalog_svc.find_book_by_isbn("978-0441172719").await.expect("should return book");
        assert_eq!(dune(), loaded);

        let res = catalog_svc.add_book(&dune()).await;
        assert!(matches!(res, Err(LibraryError::DuplicateIsbn { .. })));
        assert_eq!(1, catalog_svc.list_books().await.len());
    }

    #[tokio::test]
    async fn test_should_find_by_exact_isbn() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), StubLookup::default()).await;
        catalog_svc.add_book(&Book::new("t", "a", "abc-1")).await.expect("should add book");

        assert!(catalog_svc.find_book_by_isbn("abc-1").await.is_some());
        assert!(catalog_svc.find_book_by_isbn("ABC-1").await.is_none());
        assert!(catalog_svc.find_book_by_isbn(" abc-1").await.is_none());
        assert!(catalog_svc.find_book_by_isbn("").await.is_none());
    }

    #[tokio::test]
    async fn test_should_keep_insertion_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), StubLookup::default()).await;
        for i in 0..5 {
            catalog_svc.add_book(&Book::new(format!("title_{}", i).as_str(), "a", format!("isbn_{}", i).as_str()))
                .await.expect("should add book");
        }
        catalog_svc.remove_book("isbn_2").await.expect("should remove book");
        let isbns: Vec<String> = catalog_svc.list_books().await.iter().map(|b| b.isbn().to_string()).collect();
        assert_eq!(vec!["isbn_0", "isbn_1", "isbn_3", "isbn_4"], isbns);
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), StubLookup::default()).await;
        catalog_svc.add_book(&dune()).await.expect("should add book");
        catalog_svc.add_book(&Book::new("1984", "George Orwell", "978-0451524935")).await.expect("should add book");

        let res = catalog_svc.remove_book("missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert_eq!(2, catalog_svc.list_books().await.len());

        let removed = catalog_svc.remove_book("978-0441172719").await.expect("should remove book");
        assert_eq!(dune(), removed);
        assert_eq!(1, catalog_svc.list_books().await.len());
        assert!(catalog_svc.find_book_by_isbn("978-0441172719").await.is_none());
    }

    #[tokio::test]
    async fn test_should_persist_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        let books = vec![
            dune(),
            Book::new("İnce Memed", "Yaşar Kemal", "978-9750807142"),
            Book::new("1984", "George Orwell", "978-0451524935"),
        ];
        {
            let catalog_svc = build_catalog(&path, StubLookup::default()).await;
            for book in &books {
                catalog_svc.add_book(book).await.expect("should add book");
            }
        }
        let reopened = build_catalog(&path, StubLookup::default()).await;
        assert_eq!(books, reopened.list_books().await);
        assert_eq!(LoadOutcome::Loaded { count: 3 }, reopened.load().await);
    }

    #[tokio::test]
    async fn test_should_report_no_existing_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), StubLookup::default()).await;
        assert!(catalog_svc.list_books().await.is_empty());
        assert_eq!(LoadOutcome::NoExistingData, catalog_svc.load().await);
    }

    #[tokio::test]
    async fn test_should_degrade_to_empty_on_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "this is not json").unwrap();

        let catalog_svc = build_catalog(&path, StubLookup::default()).await;
        assert!(catalog_svc.list_books().await.is_empty());
        assert!(matches!(catalog_svc.load().await, LoadOutcome::ParseError { .. }));

        catalog_svc.add_book(&dune()).await.expect("should add book");
        let reopened = build_catalog(&path, StubLookup::default()).await;
        assert_eq!(vec![dune()], reopened.list_books().await);
    }

    #[tokio::test]
    async fn test_should_degrade_to_empty_on_missing_field() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, r#"[{"title": "Dune", "isbn": "978-0441172719"}]"#).unwrap();
        let catalog_svc = build_catalog(&path, StubLookup::default()).await;
        assert!(catalog_svc.list_books().await.is_empty());
        assert!(matches!(catalog_svc.load().await, LoadOutcome::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_should_degrade_to_empty_on_invalid_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        let mut data = b"[{\"title\": \"".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(b"\", \"author\": \"a\", \"isbn\": \"1\"}]");
        std::fs::write(&path, data).unwrap();
        let catalog_svc = build_catalog(&path, StubLookup::default()).await;
        assert!(catalog_svc.list_books().await.is_empty());
        assert!(matches!(catalog_svc.load().await, LoadOutcome::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_should_not_write_when_nothing_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        let catalog_svc = build_catalog(&path, StubLookup::default()).await;
        catalog_svc.add_book(&dune()).await.expect("should add book");

        std::fs::write(&path, "untouched").unwrap();
        let res = catalog_svc.add_book(&dune()).await;
        assert!(matches!(res, Err(LibraryError::DuplicateIsbn { .. })));
        let res = catalog_svc.add_book_by_isbn("978-0441172719").await;
        assert!(matches!(res, Err(LibraryError::DuplicateIsbn { .. })));
        let res = catalog_svc.remove_book("missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        let res = catalog_svc.add_book_by_isbn("000").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));

        assert_eq!("untouched", std::fs::read_to_string(&path).unwrap());
        assert_eq!(vec![dune()], catalog_svc.list_books().await);
    }

    #[tokio::test]
    async fn test_should_not_propagate_save_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let catalog_svc = build_catalog(&blocker.join("library.json"), StubLookup::default()).await;

        catalog_svc.add_book(&dune()).await.expect("should add book despite save failure");
        assert_eq!(vec![dune()], catalog_svc.list_books().await);
        assert!(!catalog_svc.save().await);
        catalog_svc.remove_book("978-0441172719").await.expect("should remove book despite save failure");
        assert!(catalog_svc.list_books().await.is_empty());
    }

    #[tokio::test]
    async fn test_should_add_book_by_isbn() {
        let dir = tempfile::TempDir::new().unwrap();
        let lookup = StubLookup::default()
            .with_edition("111", Ok(Edition::new(Some("X"), &["/authors/A1"])))
            .with_author("/authors/A1", Some("Y"));
        let catalog_svc = build_catalog(&dir.path().join("library.json"), lookup).await;

        let book = catalog_svc.add_book_by_isbn("111").await.expect("should add book");
        assert_eq!(Book::new("X", "Y", "111"), book);
        assert_eq!(Some(book), catalog_svc.find_book_by_isbn("111").await);
    }

    #[tokio::test]
    async fn test_should_not_add_unknown_isbn() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        let catalog_svc = build_catalog(&path, StubLookup::default()).await;

        let res = catalog_svc.add_book_by_isbn("000").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert!(catalog_svc.list_books().await.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_should_not_call_lookup_for_duplicate() {
        let dir = tempfile::TempDir::new().unwrap();
        let lookup = StubLookup::default();
        let calls = lookup.calls.clone();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), lookup).await;
        catalog_svc.add_book(&dune()).await.expect("should add book");

        let res = catalog_svc.add_book_by_isbn("978-0441172719").await;
        assert!(matches!(res, Err(LibraryError::DuplicateIsbn { .. })));
        assert_eq!(0, calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_fail_lookup_without_adding() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        let lookup = StubLookup::default()
            .with_edition("222", Err(LibraryError::lookup_failed("timed out", None)))
            .with_edition("333", Err(LibraryError::parse("unexpected payload")));
        let catalog_svc = build_catalog(&path, lookup).await;

        assert!(matches!(catalog_svc.add_book_by_isbn("222").await, Err(LibraryError::LookupFailed { .. })));
        assert!(matches!(catalog_svc.add_book_by_isbn("333").await, Err(LibraryError::LookupFailed { .. })));
        assert!(catalog_svc.list_books().await.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_should_use_placeholders() {
        let dir = tempfile::TempDir::new().unwrap();
        let lookup = StubLookup::default()
            .with_edition("111", Ok(Edition::default()))
            .with_edition("222", Ok(Edition::new(Some("T"), &["/authors/gone"])))
            .with_edition("333", Ok(Edition::new(Some("T"), &["/authors/nameless"])))
            .with_author("/authors/nameless", None);
        let catalog_svc = build_catalog(&dir.path().join("library.json"), lookup).await;

        assert_eq!(Book::new("Unknown Title", "Unknown Author", "111"),
                   catalog_svc.add_book_by_isbn("111").await.expect("should add book"));
        assert_eq!(Book::new("T", "Unknown Author", "222"),
                   catalog_svc.add_book_by_isbn("222").await.expect("should add book"));
        assert_eq!(Book::new("T", "Unknown Author", "333"),
                   catalog_svc.add_book_by_isbn("333").await.expect("should add book"));
    }

    #[tokio::test]
    async fn test_should_join_resolved_authors() {
        let dir = tempfile::TempDir::new().unwrap();
        let lookup = StubLookup::default()
            .with_edition("111", Ok(Edition::new(Some("Good Omens"), &["/authors/A1", "/authors/A2", "/authors/A3"])))
            .with_author("/authors/A1", Some("Terry Pratchett"))
            .with_author_error("/authors/A2", LibraryError::lookup_failed("timed out", None))
            .with_author("/authors/A3", Some("Neil Gaiman"));
        let calls = lookup.calls.clone();
        let catalog_svc = build_catalog(&dir.path().join("library.json"), lookup).await;

        let book = catalog_svc.add_book_by_isbn("111").await.expect("should add book");
        assert_eq!("Terry Pratchett, Neil Gaiman", book.author());
        assert_eq!(4, calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_add_same_isbn_once_under_concurrency() {
        let dir = tempfile::TempDir::new().unwrap();
        let lookup = StubLookup::default()
            .with_edition("111", Ok(Edition::new(Some("X"), &["/authors/A1"])))
            .with_author("/authors/A1", Some("Y"));
        let catalog_svc = Arc::new(build_catalog(&dir.path().join("library.json"), lookup).await);

        let (first, second) = tokio::join!(
            catalog_svc.add_book_by_isbn("111"),
            catalog_svc.add_book_by_isbn("111"));
        let added = [&first, &second].iter().filter(|r| r.is_ok()).count();
        let duplicates = [&first, &second].iter()
            .filter(|r| matches!(r, Err(LibraryError::DuplicateIsbn { .. }))).count();
        assert_eq!(1, added);
        assert_eq!(1, duplicates);
        assert_eq!(1, catalog_svc.list_books().await.len());
    }
}
