use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    DuplicateIsbn {
        message: String,
    },
    NotFound {
        message: String,
    },
    // Remote metadata could not be fetched: connection failure, timeout, unexpected
    // status or an unreadable payload. Nothing is added to the catalog in that case.
    LookupFailed {
        message: String,
        reason_code: Option<String>,
    },
    Parse {
        message: String,
    },
    Persistence {
        message: String,
    },
    MissingField {
        field: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn duplicate_isbn(isbn: &str) -> LibraryError {
        LibraryError::DuplicateIsbn { message: format!("a book with ISBN {} already exists", isbn) }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn lookup_failed(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::LookupFailed { message: message.to_string(), reason_code }
    }

    pub fn parse(message: &str) -> LibraryError {
        LibraryError::Parse { message: message.to_string() }
    }

    pub fn persistence(message: &str) -> LibraryError {
        LibraryError::Persistence { message: message.to_string() }
    }

    pub fn missing_field(field: &str) -> LibraryError {
        LibraryError::MissingField { field: field.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    // lookup_or_not_found keeps not-found outcomes and folds every other failure into LookupFailed.
    pub fn lookup_or_not_found(self) -> LibraryError {
        match self {
            LibraryError::NotFound { .. } | LibraryError::LookupFailed { .. } => self,
            other => LibraryError::lookup_failed(other.to_string().as_str(), None),
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::persistence(
            format!("io {:?}", err).as_str())
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::parse(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        let reason = err.status().map(|s| s.as_u16().to_string());
        if err.is_timeout() {
            LibraryError::lookup_failed(format!("lookup timed out {}", err).as_str(), reason)
        } else if err.is_connect() {
            LibraryError::lookup_failed(format!("lookup connection error {}", err).as_str(), reason)
        } else {
            LibraryError::lookup_failed(format!("lookup error {}", err).as_str(), reason)
        }
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::DuplicateIsbn { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::LookupFailed { message, reason_code } => {
                match reason_code {
                    Some(reason) => write!(f, "{} ({})", message, reason),
                    None => write!(f, "{}", message),
                }
            }
            LibraryError::Parse { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Persistence { message } => {
                write!(f, "{}", message)
            }
            LibraryError::MissingField { field } => {
                write!(f, "missing field `{}`", field)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for catalog operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
