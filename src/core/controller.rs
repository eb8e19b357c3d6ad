use std::sync::Arc;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

// AppState carries the single catalog created at startup into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(config: Configuration, catalog: Arc<dyn CatalogService>) -> AppState {
        AppState {
            config,
            catalog,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ServerError = (StatusCode, Json<ErrorResponse>);

pub fn json_to_server_error(err: JsonRejection) -> ServerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse {
        error: "serialization".to_string(),
        message: err.body_text(),
    }))
}

pub fn status_for(err: &CommandError) -> StatusCode {
    match err {
        CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
        CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
        // a failed lookup means the book could not be found remotely
        CommandError::LookupFailed { .. } => StatusCode::NOT_FOUND,
        CommandError::Serialization { .. } => StatusCode::BAD_REQUEST,
        CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
        CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<CommandError> for ErrorResponse {
    fn from(err: CommandError) -> Self {
        ErrorResponse {
            error: err.kind().to_string(),
            message: err.message().to_string(),
        }
    }
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        (status_for(&err), Json(ErrorResponse::from(err)))
    }
}
