use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug, PartialEq)]
pub enum CommandError {
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    LookupFailed {
        message: String,
        reason_code: Option<String>,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl CommandError {
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::DuplicateKey { .. } => "duplicate_isbn",
            CommandError::NotFound { .. } => "not_found",
            CommandError::LookupFailed { .. } => "lookup_failed",
            CommandError::Runtime { .. } => "runtime",
            CommandError::Serialization { .. } => "serialization",
            CommandError::Validation { .. } => "validation",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandError::DuplicateKey { message } => message,
            CommandError::NotFound { message } => message,
            CommandError::LookupFailed { message, .. } => message,
            CommandError::Runtime { message, .. } => message,
            CommandError::Serialization { message } => message,
            CommandError::Validation { message, .. } => message,
        }
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::DuplicateIsbn { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::LookupFailed { message, reason_code } => {
                CommandError::LookupFailed { message, reason_code }
            }
            LibraryError::Parse { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::MissingField { field } => {
                CommandError::Serialization { message: format!("missing field `{}`", field) }
            }
            LibraryError::Persistence { message } => {
                CommandError::Runtime { message, reason_code: None }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}

// required_isbn trims the incoming ISBN and rejects blank values before any catalog call
pub(crate) fn required_isbn(isbn: &str) -> Result<String, CommandError> {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return Err(CommandError::Validation {
            message: "ISBN cannot be empty".to_string(),
            reason_code: None,
        });
    }
    Ok(isbn.to_string())
}
