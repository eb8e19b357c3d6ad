use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::str::FromStr;
use crate::books::domain::model::Book;
use crate::catalog::domain::CatalogService;
use crate::core::library::LibraryError;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MenuChoice {
    AddByIsbn,
    AddManual,
    Remove,
    List,
    Search,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::AddByIsbn,
        MenuChoice::AddManual,
        MenuChoice::Remove,
        MenuChoice::List,
        MenuChoice::Search,
        MenuChoice::Exit,
    ];

    pub fn number(&self) -> usize {
        match self {
            MenuChoice::AddByIsbn => 1,
            MenuChoice::AddManual => 2,
            MenuChoice::Remove => 3,
            MenuChoice::List => 4,
            MenuChoice::Search => 5,
            MenuChoice::Exit => 6,
        }
    }
}

impl FromStr for MenuChoice {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = s.trim();
        MenuChoice::ALL.iter()
            .find(|c| c.number().to_string() == choice)
            .copied()
            .ok_or_else(|| LibraryError::validation(
                "Invalid choice! Please enter a number between 1 and 6.", Some(choice.to_string())))
    }
}

impl Display for MenuChoice {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MenuChoice::AddByIsbn => write!(f, "Add book (by ISBN)"),
            MenuChoice::AddManual => write!(f, "Add book (manually)"),
            MenuChoice::Remove => write!(f, "Remove book"),
            MenuChoice::List => write!(f, "List books"),
            MenuChoice::Search => write!(f, "Search book"),
            MenuChoice::Exit => write!(f, "Exit"),
        }
    }
}

pub fn render_menu() -> String {
    let rule = "=".repeat(50);
    let mut lines = vec![rule.clone(), "LIBRARY CATALOG".to_string(), rule];
    for choice in MenuChoice::ALL {
        lines.push(format!("{}. {}", choice.number(), choice));
    }
    lines.push("-".repeat(50));
    lines.join("\n")
}

// Prompter asks the user for one line of input
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

const EMPTY_ISBN: &str = "ISBN cannot be empty!";

pub async fn add_by_isbn(catalog: &dyn CatalogService, isbn: &str) -> String {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return EMPTY_ISBN.to_string();
    }
    match catalog.add_book_by_isbn(isbn).await {
        Ok(book) => format!("Book added: {}", book),
        Err(LibraryError::DuplicateIsbn { .. }) => format!("A book with ISBN {} already exists!", isbn),
        Err(LibraryError::NotFound { .. }) => "Book not found. Please enter a valid ISBN.".to_string(),
        Err(err) => format!("Could not fetch book details: {}", err),
    }
}

pub async fn add_manual(catalog: &dyn CatalogService, title: &str, author: &str, isbn: &str) -> String {
    let (title, author, isbn) = (title.trim(), author.trim(), isbn.trim());
    if title.is_empty() || author.is_empty() || isbn.is_empty() {
        return "Please fill in all fields!".to_string();
    }
    match catalog.add_book(&Book::new(title, author, isbn)).await {
        Ok(book) => format!("Book added: {}", book),
        Err(LibraryError::DuplicateIsbn { .. }) => format!("A book with ISBN {} already exists!", isbn),
        Err(err) => format!("Could not add book: {}", err),
    }
}

pub async fn remove(catalog: &dyn CatalogService, isbn: &str) -> String {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return EMPTY_ISBN.to_string();
    }
    match catalog.remove_book(isbn).await {
        Ok(book) => format!("Book removed: {}", book),
        Err(LibraryError::NotFound { .. }) => "Book not found!".to_string(),
        Err(err) => format!("Could not remove book: {}", err),
    }
}

pub async fn list(catalog: &dyn CatalogService) -> String {
    let books = catalog.list_books().await;
    if books.is_empty() {
        return "There are no books in the library yet.".to_string();
    }
    let mut lines = vec![format!("BOOKS IN THE LIBRARY ({}):", books.len()), "-".repeat(80)];
    for (i, book) in books.iter().enumerate() {
        lines.push(format!("{:2}. {}", i + 1, book));
    }
    lines.join("\n")
}

pub async fn search(catalog: &dyn CatalogService, isbn: &str) -> String {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return EMPTY_ISBN.to_string();
    }
    match catalog.find_book_by_isbn(isbn).await {
        Some(book) => format!("Book found: {}", book),
        None => "Book not found!".to_string(),
    }
}

/// Runs one menu choice, prompting for whatever it needs.
///
/// Returns the outcome message to print, or `None` when the user chose to exit.
pub async fn handle(catalog: &dyn CatalogService, choice: MenuChoice,
                    prompter: &mut dyn Prompter) -> io::Result<Option<String>> {
    let message = match choice {
        MenuChoice::AddByIsbn => {
            let isbn = prompter.ask("Book ISBN")?;
            add_by_isbn(catalog, isbn.as_str()).await
        }
        MenuChoice::AddManual => {
            let title = prompter.ask("Title")?;
            let author = prompter.ask("Author")?;
            let isbn = prompter.ask("ISBN")?;
            add_manual(catalog, title.as_str(), author.as_str(), isbn.as_str()).await
        }
        MenuChoice::Remove => {
            let isbn = prompter.ask("ISBN of the book to remove")?;
            remove(catalog, isbn.as_str()).await
        }
        MenuChoice::List => list(catalog).await,
        MenuChoice::Search => {
            let isbn = prompter.ask("ISBN of the book to search")?;
            search(catalog, isbn.as_str()).await
        }
        MenuChoice::Exit => return Ok(None),
    };
    Ok(Some(message))
}
